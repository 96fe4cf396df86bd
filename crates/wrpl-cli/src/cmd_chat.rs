/// Implementation of `wrpl chat`.
///
/// Prints every chat packet as one transcript line:
///
/// ```text
/// [01:01.250] pilot_one (channel 1, ally): gl hf
/// [01:35.210] red_five (channel 2, enemy): o7
/// ```
///
/// Sender and message bytes that are not valid UTF-8 are shown with
/// replacement characters. Chat packets that fail to deserialize are
/// logged and skipped.
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use wrpl_decoder::PacketStream;
use wrpl_types::{ChatPacket, PacketBody, PacketType};

use crate::FileArgs;
use crate::locate;

/// Run the `wrpl chat` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no zlib stream,
/// or stdout cannot be written.
pub fn run(args: &FileArgs) -> Result<()> {
    let replay = locate::load(&args.file)?;
    let mut stream = PacketStream::with_base_offset(replay.stream(), replay.base_offset());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in stream.by_ref() {
        if record.packet_type() != Some(PacketType::Chat) {
            continue;
        }
        let timestamp_ms = record.timestamp_ms().unwrap_or_default();
        match &record.body {
            Ok(PacketBody::Chat(chat)) => {
                writeln!(out, "{}", transcript_line(timestamp_ms, chat))
                    .context("cannot write to stdout")?;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(index = record.index, "skipping unreadable chat packet: {e}"),
        }
    }
    out.flush().context("cannot write to stdout")?;

    let (_, reason) = stream.into_parts();
    if !reason.is_clean() {
        tracing::warn!("transcript may be incomplete: {reason}");
    }
    Ok(())
}

/// `mm:ss.mmm`; minutes keep counting past 59.
pub fn format_timestamp(ms: u32) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, ms / 1000 % 60, ms % 1000)
}

fn transcript_line(timestamp_ms: u32, chat: &ChatPacket) -> String {
    format!(
        "[{}] {} (channel {}, {}): {}",
        format_timestamp(timestamp_ms),
        chat.sender_lossy(),
        chat.channel_id,
        if chat.is_enemy { "enemy" } else { "ally" },
        chat.message_lossy()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0), "00:00.000");
        assert_eq!(format_timestamp(61_250), "01:01.250");
        assert_eq!(format_timestamp(100 * 60_000 + 5), "100:00.005");
    }

    #[test]
    fn transcript_line_format() {
        let chat = ChatPacket {
            sender_name: b"red_five".to_vec(),
            message: b"o7".to_vec(),
            is_enemy: true,
            channel_id: 2,
            bits_read: 0,
        };
        assert_eq!(
            transcript_line(95_210, &chat),
            "[01:35.210] red_five (channel 2, enemy): o7"
        );
    }
}
