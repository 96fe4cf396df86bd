use std::io::{self, Write};

use wrpl_decoder::{Diagnostic, PacketRecord, RunSummary, StopReason};
use wrpl_types::PacketBody;

/// Minimal renderer: one line per packet.
///
/// ```text
/// #0 t=1000ms mpi len=6 obj=0x1234 msg=0x5678 tail=2
/// #1 t=1000ms chat len=9 "Bob" (channel 2, enemy): "hi"
/// #2 t=1250ms snapshot len=3 [warning: incomplete packet: expected 40 bytes, got 8]
/// #3 empty packet
/// -- 4 packets, 71 bytes decompressed, stopped: clean end of stream
/// ```
pub struct MinimalRenderer;

impl MinimalRenderer {
    /// # Errors
    ///
    /// Any error from `out`.
    pub fn render_packet(out: &mut dyn Write, record: &PacketRecord) -> io::Result<()> {
        let Some(packet_type) = record.packet_type() else {
            return writeln!(out, "#{} empty packet", record.index);
        };
        write!(
            out,
            "#{} t={}ms {packet_type} len={}",
            record.index,
            record.timestamp_ms().unwrap_or_default(),
            record.payload_len
        )?;

        match &record.body {
            Ok(PacketBody::Chat(chat)) => write!(
                out,
                " {:?} (channel {}, {}): {:?}",
                chat.sender_lossy(),
                chat.channel_id,
                if chat.is_enemy { "enemy" } else { "ally" },
                chat.message_lossy()
            )?,
            Ok(PacketBody::Mpi(mpi)) => write!(
                out,
                " obj=0x{:04X} msg=0x{:04X} tail={}",
                mpi.object_id,
                mpi.message_id,
                mpi.payload.len()
            )?,
            Ok(PacketBody::Generic(_)) => {}
            Err(e) => write!(out, " error: {e}")?,
        }

        for diagnostic in &record.diagnostics {
            if *diagnostic != Diagnostic::EmptyPacket {
                write!(out, " [warning: {diagnostic}]")?;
            }
        }
        writeln!(out)
    }

    /// # Errors
    ///
    /// Any error from `out`.
    pub fn render_footer(
        out: &mut dyn Write,
        summary: &RunSummary,
        reason: &StopReason,
    ) -> io::Result<()> {
        writeln!(
            out,
            "-- {} packets, {} bytes decompressed, stopped: {reason}",
            summary.packets, summary.decompressed_bytes
        )
    }
}
