/// Implementation of `wrpl locate`.
///
/// ```text
/// Read 48213 bytes from match.wrpl
/// Found zlib stream at offset 1184 (0x4a0), signature 78 9c. Size: 47029 bytes
/// ```
use anyhow::Result;

use crate::FileArgs;
use crate::locate;

/// Run the `wrpl locate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no zlib stream.
pub fn run(args: &FileArgs) -> Result<()> {
    let replay = locate::load(&args.file)?;
    println!(
        "Read {} bytes from {}",
        replay.bytes.len(),
        args.file.display()
    );
    println!(
        "Found zlib stream at offset {0} ({0:#x}), signature {1:02x} {2:02x}. Size: {3} bytes",
        replay.stream_offset,
        replay.signature[0],
        replay.signature[1],
        replay.stream().len()
    );
    Ok(())
}
