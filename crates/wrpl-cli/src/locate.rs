use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// zlib stream headers, in the order they are searched for: no, default,
/// then best compression.
pub const ZLIB_SIGNATURES: [[u8; 2]; 3] = [[0x78, 0x01], [0x78, 0x9C], [0x78, 0xDA]];

/// A replay file loaded into memory, with its compressed stream located.
pub struct Replay {
    pub bytes: Vec<u8>,
    pub stream_offset: usize,
    pub signature: [u8; 2],
}

impl Replay {
    /// The compressed stream and everything after it.
    pub fn stream(&self) -> &[u8] {
        &self.bytes[self.stream_offset..]
    }

    pub fn base_offset(&self) -> u64 {
        self.stream_offset as u64
    }
}

/// Offset of the compressed stream in `data`.
///
/// Each signature is tried in priority order over the whole buffer; the
/// first one found anywhere wins, even if a lower-priority signature
/// occurs earlier.
pub fn find_stream(data: &[u8]) -> Option<(usize, [u8; 2])> {
    ZLIB_SIGNATURES.iter().find_map(|sig| {
        data.windows(2)
            .position(|w| w == sig)
            .map(|pos| (pos, *sig))
    })
}

/// Read `path` and locate its compressed stream.
///
/// # Errors
///
/// Fails when the file cannot be read or contains no zlib signature.
pub fn load(path: &Path) -> Result<Replay> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    tracing::debug!(len = bytes.len(), path = %path.display(), "read replay file");

    let Some((stream_offset, signature)) = find_stream(&bytes) else {
        bail!("zlib stream not found in {}", path.display());
    };
    tracing::debug!(stream_offset, "found zlib stream");

    Ok(Replay {
        bytes,
        stream_offset,
        signature,
    })
}
