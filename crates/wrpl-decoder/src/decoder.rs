use std::io::Read;

use crate::record::{PacketRecord, RunSummary, StopReason};
use crate::streaming::PacketStream;

/// The result of decoding a whole replay stream.
///
/// ```text
/// ┌────────────────────────────────────────────────────────┐
/// │ DecodedReplay                                          │
/// │   packets:     Vec<PacketRecord>  ← wire order         │
/// │   summary:     RunSummary         ← counters at stop   │
/// │   stop_reason: StopReason         ← why decoding ended │
/// └────────────────────────────────────────────────────────┘
/// ```
///
/// Packets decoded before a framing error or a fatal fault are kept.
#[derive(Debug)]
pub struct DecodedReplay {
    pub packets: Vec<PacketRecord>,
    pub summary: RunSummary,
    pub stop_reason: StopReason,
}

impl DecodedReplay {
    /// True when every byte of the stream was decoded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop_reason.is_clean()
    }
}

/// Collecting replay decoder.
///
/// Decoding never returns `Err`: every way a run can end, including
/// fatal decompression faults, is reported through
/// [`DecodedReplay::stop_reason`] alongside whatever was decoded first.
/// Use [`PacketStream`] directly to process packets without keeping them.
///
/// # Example
///
/// ```rust
/// use wrpl_decoder::{ReplayDecoder, StopReason};
///
/// let decoded = ReplayDecoder::decode(std::io::empty());
/// assert!(decoded.packets.is_empty());
/// assert!(matches!(decoded.stop_reason, StopReason::TruncatedStream));
/// ```
pub struct ReplayDecoder;

impl ReplayDecoder {
    /// Decode a zlib-compressed packet stream from `source`.
    pub fn decode<R: Read>(source: R) -> DecodedReplay {
        Self::decode_at(source, 0)
    }

    /// Decode a stream found `base_offset` bytes into its host file, so
    /// record offsets point into that file.
    pub fn decode_at<R: Read>(source: R, base_offset: u64) -> DecodedReplay {
        let mut stream = PacketStream::with_base_offset(source, base_offset);
        let packets: Vec<_> = stream.by_ref().collect();
        let (summary, stop_reason) = stream.into_parts();
        DecodedReplay {
            packets,
            summary,
            stop_reason,
        }
    }

    /// Decode an in-memory compressed buffer.
    pub fn decode_slice(compressed: &[u8]) -> DecodedReplay {
        Self::decode(compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;
    use wrpl_types::{PacketBody, PacketType};

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn decodes_mpi_packet() {
        let compressed = zlib(&[
            0x87, 0x14, 0x34, 0x12, 0x78, 0x56, 0xAA, 0xBB, // continuation MPI
        ]);
        let decoded = ReplayDecoder::decode_slice(&compressed);
        assert!(decoded.is_complete());
        assert_eq!(decoded.packets.len(), 1);

        let record = &decoded.packets[0];
        assert_eq!(record.packet_type(), Some(PacketType::Mpi));
        let Ok(PacketBody::Mpi(mpi)) = &record.body else {
            panic!("expected mpi body, got {:?}", record.body);
        };
        assert_eq!(mpi.object_id, 0x1234);
        assert_eq!(mpi.message_id, 0x5678);
        assert_eq!(mpi.payload, [0xAA, 0xBB]);
    }

    #[test]
    fn packets_before_framing_error_survive() {
        let compressed = zlib(&[0x81, 0x11, 0x81, 0x12, 0xFF]);
        let decoded = ReplayDecoder::decode_slice(&compressed);
        assert_eq!(decoded.packets.len(), 2);
        assert!(!decoded.is_complete());
        assert!(matches!(
            decoded.stop_reason,
            StopReason::InvalidSizePrefix { .. }
        ));
        assert_eq!(decoded.summary.packets, 2);
    }

    #[test]
    fn base_offset_is_applied() {
        let compressed = zlib(&[0x81, 0x11]);
        let decoded = ReplayDecoder::decode_at(compressed.as_slice(), 1000);
        assert!(decoded.packets[0].compressed_offset >= 1000);
        assert_eq!(
            decoded.summary.compressed_offset,
            1000 + compressed.len() as u64
        );
    }
}
