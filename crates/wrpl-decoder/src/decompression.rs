use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::DecodeError;

/// Size of each compressed read from the source and of each inflate step's
/// output window.
const CHUNK_SIZE: usize = 16 * 1024;

/// Pull-based view of a zlib stream's decompressed bytes.
///
/// Compressed input is pulled from the source in [`CHUNK_SIZE`] reads only
/// when the output queue cannot satisfy a request. Decompressed bytes sit
/// in a FIFO queue; [`prepend`](Self::prepend) pushes bytes back onto its
/// front so a caller can un-read a speculative over-read.
///
/// ```text
///   source ──read──▶ input chunk ──inflate──▶ output queue ──read(n)──▶ caller
///                                              ▲
///                                              └──── prepend(bytes)
/// ```
///
/// Anything after the zlib end-of-stream marker is never inflated.
pub struct InflateReader<R> {
    source: R,
    inflater: Decompress,
    output: VecDeque<u8>,
    input: Vec<u8>,
    input_pos: usize,
    input_len: usize,
    out_chunk: Vec<u8>,
    /// The source returned 0 bytes.
    source_eof: bool,
    /// No further output can be produced.
    finished: bool,
    /// The inflater reported the end-of-stream marker.
    stream_end: bool,
    /// Compressed bytes pulled from the source so far.
    compressed_read: u64,
    base_offset: u64,
}

impl<R: Read> InflateReader<R> {
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::with_base_offset(source, 0)
    }

    /// Like [`new`](Self::new), with [`tell`](Self::tell) offsets reported
    /// relative to `base_offset` (e.g. the stream's offset in its host file).
    #[must_use]
    pub fn with_base_offset(source: R, base_offset: u64) -> Self {
        Self {
            source,
            inflater: Decompress::new(true),
            output: VecDeque::with_capacity(CHUNK_SIZE),
            input: vec![0; CHUNK_SIZE],
            input_pos: 0,
            input_len: 0,
            out_chunk: vec![0; CHUNK_SIZE],
            source_eof: false,
            finished: false,
            stream_end: false,
            compressed_read: 0,
            base_offset,
        }
    }

    /// Remove and return up to `n` decompressed bytes.
    ///
    /// Fewer than `n` bytes come back only when the stream has ended.
    ///
    /// # Errors
    ///
    /// [`DecodeError::DecompressFailed`] if the compressed data is corrupt,
    /// [`DecodeError::Io`] if the source fails.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.fill(n)?;
        let take = n.min(self.output.len());
        Ok(self.output.drain(..take).collect())
    }

    /// Push `bytes` back onto the front of the output queue, so the next
    /// [`read`](Self::read) returns them first, in order.
    pub fn prepend(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter().rev() {
            self.output.push_front(byte);
        }
    }

    /// Best-effort offset of the next unconsumed compressed byte: bytes
    /// pulled from the source minus those still waiting in the input chunk.
    /// Diagnostic only.
    #[must_use]
    pub fn tell(&self) -> u64 {
        let pending = (self.input_len - self.input_pos) as u64;
        self.base_offset + self.compressed_read - pending
    }

    /// True when no more output can ever be produced.
    ///
    /// Tries to buffer at least one byte first, so this may read from the
    /// source.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn is_eof(&mut self) -> Result<bool, DecodeError> {
        self.fill(1)?;
        Ok(self.finished && self.output.is_empty())
    }

    /// True once the zlib end-of-stream marker has been seen. A stream that
    /// finished without it was truncated.
    #[must_use]
    pub fn reached_stream_end(&self) -> bool {
        self.stream_end
    }

    /// Total bytes the inflater has produced, including ones still queued.
    #[must_use]
    pub fn total_out(&self) -> u64 {
        self.inflater.total_out()
    }

    #[must_use]
    pub fn buffered(&self) -> usize {
        self.output.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill(&mut self, min_bytes: usize) -> Result<(), DecodeError> {
        while self.output.len() < min_bytes && !self.finished {
            if self.input_pos == self.input_len && !self.source_eof {
                let n = read_chunk(&mut self.source, &mut self.input)?;
                self.input_pos = 0;
                self.input_len = n;
                self.compressed_read += n as u64;
                if n == 0 {
                    self.source_eof = true;
                }
            }

            let before_in = self.inflater.total_in();
            let before_out = self.inflater.total_out();
            let result = self.inflater.decompress(
                &self.input[self.input_pos..self.input_len],
                &mut self.out_chunk,
                FlushDecompress::None,
            );
            let status = match result {
                Ok(status) => status,
                Err(e) => {
                    let compressed_offset = self.tell();
                    tracing::error!(compressed_offset, "inflate failed: {e}");
                    return Err(DecodeError::DecompressFailed {
                        message: e.to_string(),
                        compressed_offset,
                    });
                }
            };

            // Both deltas are bounded by the slice lengths passed in.
            let consumed = (self.inflater.total_in() - before_in) as usize;
            let produced = (self.inflater.total_out() - before_out) as usize;
            self.input_pos += consumed;
            self.output.extend(&self.out_chunk[..produced]);

            match status {
                Status::StreamEnd => {
                    self.finished = true;
                    self.stream_end = true;
                }
                Status::Ok | Status::BufError => {
                    let stalled = consumed == 0 && produced == 0;
                    if stalled && self.source_eof {
                        tracing::warn!(
                            total_out = self.inflater.total_out(),
                            "compressed source ended before the end-of-stream marker"
                        );
                        self.finished = true;
                    } else if stalled && self.input_pos < self.input_len {
                        tracing::warn!(
                            compressed_offset = self.tell(),
                            "inflater made no progress on pending input"
                        );
                        self.finished = true;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fill `buf` with one read from `source`, retrying interrupted reads.
fn read_chunk(source: &mut impl Read, buf: &mut [u8]) -> Result<usize, DecodeError> {
    loop {
        match source.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    /// A source that hands out one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn reads_whole_stream_in_pieces() {
        let data: Vec<u8> = (0..100u8).collect();
        let compressed = zlib(&data);
        let mut reader = InflateReader::new(compressed.as_slice());

        assert_eq!(reader.read(10).unwrap(), data[..10]);
        assert_eq!(reader.read(85).unwrap(), data[10..95]);
        // Short read at the end of the stream
        assert_eq!(reader.read(50).unwrap(), data[95..]);
        assert!(reader.read(1).unwrap().is_empty());
        assert!(reader.is_eof().unwrap());
        assert!(reader.reached_stream_end());
        assert_eq!(reader.total_out(), 100);
    }

    #[test]
    fn read_prepend_read_is_idempotent() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = zlib(data);
        let mut reader = InflateReader::new(compressed.as_slice());

        let first = reader.read(5).unwrap();
        reader.prepend(&first);
        let again = reader.read(5).unwrap();
        assert_eq!(first, again);
        assert_eq!(again, b"the q");
        assert_eq!(reader.read(6).unwrap(), b"uick b");
    }

    #[test]
    fn prepend_partial_tail_keeps_order() {
        let compressed = zlib(b"abcdefgh");
        let mut reader = InflateReader::new(compressed.as_slice());
        let five = reader.read(5).unwrap();
        reader.prepend(&five[2..]);
        assert_eq!(reader.read(6).unwrap(), b"cdefgh");
    }

    #[test]
    fn output_larger_than_one_chunk() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let compressed = zlib(&data);
        let mut reader = InflateReader::new(compressed.as_slice());
        let mut out = Vec::new();
        while !reader.is_eof().unwrap() {
            out.extend(reader.read(1000).unwrap());
        }
        assert_eq!(out, data);
    }

    #[test]
    fn byte_at_a_time_source() {
        let data = b"trickled input still inflates".repeat(20);
        let compressed = zlib(&data);
        let mut reader = InflateReader::new(Trickle(&compressed));
        assert_eq!(reader.read(data.len()).unwrap(), data);
        assert!(reader.is_eof().unwrap());
    }

    #[test]
    fn empty_stream_is_eof_immediately() {
        let compressed = zlib(&[]);
        let mut reader = InflateReader::new(compressed.as_slice());
        assert!(reader.is_eof().unwrap());
        assert!(reader.read(5).unwrap().is_empty());
    }

    #[test]
    fn empty_source_is_eof_without_stream_end() {
        let mut reader = InflateReader::new(std::io::empty());
        assert!(reader.is_eof().unwrap());
        assert!(!reader.reached_stream_end());
    }

    #[test]
    fn truncated_stream_yields_prefix_then_eof() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 256) as u8).collect();
        let compressed = zlib(&data);
        let cut = &compressed[..compressed.len() / 2];
        let mut reader = InflateReader::new(cut);

        let out = reader.read(data.len()).unwrap();
        assert!(out.len() < data.len());
        assert_eq!(out, data[..out.len()]);
        assert!(reader.is_eof().unwrap());
        assert!(!reader.reached_stream_end());
    }

    #[test]
    fn corrupt_stream_is_fatal() {
        // Valid zlib header followed by a reserved block type (BTYPE=11)
        let garbage = [0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = InflateReader::new(&garbage[..]);
        assert!(matches!(
            reader.read(1),
            Err(DecodeError::DecompressFailed { .. })
        ));
    }

    #[test]
    fn trailing_bytes_after_stream_end_are_not_inflated() {
        let mut compressed = zlib(b"payload");
        let stream_len = compressed.len() as u64;
        compressed.extend_from_slice(b"trailing junk");

        let mut reader = InflateReader::with_base_offset(compressed.as_slice(), 0x100);
        assert_eq!(reader.read(100).unwrap(), b"payload");
        assert!(reader.is_eof().unwrap());
        assert_eq!(reader.tell(), 0x100 + stream_len);
    }

    #[test]
    fn io_errors_propagate() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }
        let mut reader = InflateReader::new(Broken);
        assert!(matches!(reader.read(1), Err(DecodeError::Io(_))));
    }
}
