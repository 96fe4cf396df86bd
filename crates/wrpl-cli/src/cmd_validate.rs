/// Implementation of `wrpl validate`.
///
/// Decodes the whole stream and reports how it ended. Packets whose body
/// fails to deserialize, and packets with recorded warnings, are counted
/// but do not fail validation; only a stream that stops on anything other
/// than its clean end does.
///
/// # Success output
///
/// ```text
/// ✓ Stream: zlib stream at offset 1184
/// ✓ Packets: 412 packets decoded
/// ✓ Bodies: all packet bodies deserialize without error
/// ✓ Framing: clean end of stream
/// ```
///
/// # Failure output
///
/// ```text
/// ✓ Stream: zlib stream at offset 1184
/// ✓ Packets: 97 packets decoded
/// ! Bodies: 2 of 97 packet bodies failed to deserialize
/// ! Warnings: 1 packet warning recorded
/// ✗ Framing: invalid size prefix (bytes: c3010000ff)
/// ```
use anyhow::{Result, anyhow};
use wrpl_decoder::PacketStream;

use crate::FileArgs;
use crate::locate;

/// Run the `wrpl validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no zlib stream,
/// or if decoding stopped before the stream's clean end.
pub fn run(args: &FileArgs) -> Result<()> {
    let replay = locate::load(&args.file)?;
    println!("✓ Stream: zlib stream at offset {}", replay.stream_offset);

    let mut stream = PacketStream::with_base_offset(replay.stream(), replay.base_offset());
    let mut body_failures = 0usize;
    let mut warnings = 0usize;
    for record in stream.by_ref() {
        if record.body.is_err() && record.header.is_some() {
            body_failures += 1;
        }
        warnings += record.diagnostics.len();
    }
    let (summary, reason) = stream.into_parts();

    println!(
        "✓ Packets: {} packet{} decoded",
        summary.packets,
        plural(summary.packets)
    );
    if body_failures == 0 {
        println!("✓ Bodies: all packet bodies deserialize without error");
    } else {
        println!(
            "! Bodies: {body_failures} of {} packet bodies failed to deserialize",
            summary.packets
        );
    }
    if warnings > 0 {
        println!("! Warnings: {warnings} packet warning{} recorded", plural(warnings));
    }

    if reason.is_clean() {
        println!("✓ Framing: {reason}");
        Ok(())
    } else {
        println!("✗ Framing: {reason}");
        Err(anyhow!("validation failed"))
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
