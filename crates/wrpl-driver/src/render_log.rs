use std::io::{self, Write};

use wrpl_decoder::{PacketRecord, RunSummary, StopReason};
use wrpl_types::PacketBody;

use crate::hex;

/// Log renderer: a multi-line report per packet, in the style of a
/// packet-trace log.
///
/// Example output:
///
/// ```text
///
/// == Packet 0 (Comp. offset ~0x1a) ==
///   Read size prefix (1 decomp. bytes): Expected payload size = 11 bytes
///   Parsed Header (5 bytes): Type=mpi, Timestamp=1000ms
///   Actual Payload Size: 6 bytes
///   MPI Header:      ObjectID=0x1234, MessageID=0x5678
///   Payload Hex: AA BB
///
/// == End of stream processing (Comp. offset ~0x2f) ==
/// Stop reason: clean end of stream
/// Packets decoded: 1
/// Total decompressed bytes processed: 11
/// ```
pub struct LogRenderer;

impl LogRenderer {
    /// Write the report for one packet.
    ///
    /// # Errors
    ///
    /// Any error from `out`.
    pub fn render_packet(
        out: &mut dyn Write,
        record: &PacketRecord,
        max_hex_bytes: usize,
    ) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "== Packet {} (Comp. offset ~{:#x}) ==",
            record.index, record.compressed_offset
        )?;
        writeln!(
            out,
            "  Read size prefix ({} decomp. bytes): Expected payload size = {} bytes",
            record.prefix_len, record.declared_len
        )?;
        for diagnostic in &record.diagnostics {
            writeln!(out, "  Warning: {diagnostic}")?;
        }

        let Some(header) = record.header else {
            return Ok(());
        };
        let packet_type = wrpl_types::PacketType::from_wire_id(header.packet_type);
        writeln!(
            out,
            "  Parsed Header ({} bytes): Type={packet_type}, Timestamp={}ms",
            header.header_len, header.timestamp_ms
        )?;
        writeln!(out, "  Actual Payload Size: {} bytes", record.payload_len)?;

        match &record.body {
            Ok(PacketBody::Chat(chat)) => {
                writeln!(
                    out,
                    "  Chat:            Sender={:?}, Channel={}, Enemy={}",
                    chat.sender_lossy(),
                    chat.channel_id,
                    chat.is_enemy
                )?;
                writeln!(out, "  Message:         {:?}", chat.message_lossy())?;
            }
            Ok(PacketBody::Mpi(mpi)) => {
                writeln!(
                    out,
                    "  MPI Header:      ObjectID=0x{:04X}, MessageID=0x{:04X}",
                    mpi.object_id, mpi.message_id
                )?;
                write_hex(out, &mpi.payload, max_hex_bytes)?;
            }
            Ok(PacketBody::Generic(generic)) => {
                write_hex(out, &generic.raw_payload, max_hex_bytes)?;
            }
            Err(e) => writeln!(out, "  Deserialize Error: {e}")?,
        }
        Ok(())
    }

    /// Write the end-of-stream footer.
    ///
    /// # Errors
    ///
    /// Any error from `out`.
    pub fn render_footer(
        out: &mut dyn Write,
        summary: &RunSummary,
        reason: &StopReason,
    ) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "== End of stream processing (Comp. offset ~{:#x}) ==",
            summary.compressed_offset
        )?;
        writeln!(out, "Stop reason: {reason}")?;
        writeln!(out, "Packets decoded: {}", summary.packets)?;
        writeln!(
            out,
            "Total decompressed bytes processed: {}",
            summary.decompressed_bytes
        )
    }
}

fn write_hex(out: &mut dyn Write, bytes: &[u8], limit: usize) -> io::Result<()> {
    if bytes.is_empty() {
        writeln!(out, "  Payload Hex: (empty)")
    } else {
        writeln!(out, "  Payload Hex: {}", hex::preview(bytes, limit))
    }
}
