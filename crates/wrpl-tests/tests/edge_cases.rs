//! Edge cases for the packet stream, driven through the public decoder API
//! with streams built by [`ReplayBuilder`].
//!
//! - **Framing**: empty streams, zero-length packets, packets that declare
//!   more bytes than the stream holds, reserved and cut-off size prefixes.
//! - **Timestamps**: continuation headers and absolute headers cut short.
//! - **Compression**: corrupt deflate data, a source cut mid-stream, host
//!   bytes after the stream end, and a reader that yields one byte at a time.
//! - **Consumers**: sinks that stop early.

use std::io::{self, Read};
use std::ops::ControlFlow;

use wrpl_decoder::{
    Diagnostic, PacketRecord, PacketStream, ReplayDecoder, StopReason, decode_with_sink,
};
use wrpl_tests::{ReplayBuilder, zlib};
use wrpl_types::{DeserializeError, GenericPacket, PacketBody, PacketType};
use wrpl_wire::TimestampForm;

/// Yields at most one byte per `read` call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

fn types(packets: &[PacketRecord]) -> Vec<Option<PacketType>> {
    packets.iter().map(PacketRecord::packet_type).collect()
}

// ── Framing ───────────────────────────────────────────────────────────────────

#[test]
fn empty_stream_is_clean() {
    let decoded = ReplayDecoder::decode_slice(&ReplayBuilder::new().compress());
    assert!(decoded.packets.is_empty());
    assert!(matches!(decoded.stop_reason, StopReason::EndOfStream));
    assert!(decoded.is_complete());
    assert_eq!(decoded.summary.packets, 0);
    assert_eq!(decoded.summary.decompressed_bytes, 0);
}

#[test]
fn zero_length_packet_is_reported_and_skipped() {
    let stream = ReplayBuilder::new()
        .framed(&[])
        .absolute(PacketType::Snapshot, 12, &[9, 9])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    assert_eq!(decoded.packets.len(), 2);
    let empty = &decoded.packets[0];
    assert!(empty.header.is_none());
    assert_eq!(empty.diagnostics, [Diagnostic::EmptyPacket]);
    assert!(matches!(
        empty.body,
        Err(DeserializeError::InsufficientData { needed: 1, available: 0 })
    ));

    assert_eq!(decoded.packets[1].packet_type(), Some(PacketType::Snapshot));
    assert!(decoded.is_complete());
}

#[test]
fn oversized_declared_length_yields_one_short_packet() {
    let stream = ReplayBuilder::new()
        .absolute(PacketType::Ecs, 300, &[1, 2])
        // declares 63 bytes, delivers 4
        .raw(&[0xBF, 0x16, 0xAA, 0xBB, 0xCC])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    assert_eq!(decoded.packets.len(), 2);
    let short = &decoded.packets[1];
    assert!(short.is_truncated());
    assert_eq!(short.declared_len, 63);
    assert_eq!(short.received_len, 4);
    assert_eq!(short.packet_type(), Some(PacketType::Ecs));
    assert_eq!(short.timestamp_ms(), Some(300));
    assert_eq!(
        short.diagnostics,
        [Diagnostic::TruncatedPacket {
            expected: 63,
            actual: 4
        }]
    );
    assert_eq!(
        short.body.as_ref().ok(),
        Some(&PacketBody::Generic(GenericPacket {
            raw_payload: vec![0xAA, 0xBB, 0xCC]
        }))
    );
    assert!(matches!(
        decoded.stop_reason,
        StopReason::TruncatedPacket {
            expected: 63,
            actual: 4
        }
    ));
    assert!(!decoded.stop_reason.is_clean());
    assert!(!decoded.is_complete());
}

#[test]
fn reserved_prefix_stops_and_keeps_earlier_packets() {
    let stream = ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 0, &[])
        .mpi(None, 7, 8, &[])
        .raw(&[0xC5, 0x00, 0x01])
        .absolute(PacketType::EndMarker, 9, &[])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    assert_eq!(
        types(&decoded.packets),
        [Some(PacketType::StartMarker), Some(PacketType::Mpi)]
    );
    match &decoded.stop_reason {
        StopReason::InvalidSizePrefix { prefix } => assert_eq!(prefix[0], 0xC5),
        other => panic!("expected InvalidSizePrefix, got {other:?}"),
    }
    assert!(!decoded.is_complete());
    assert!(!decoded.stop_reason.is_fatal());
}

#[test]
fn multibyte_prefix_cut_by_stream_end() {
    let stream = ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 0, &[])
        .raw(&[0x10, 0x00])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    assert_eq!(decoded.packets.len(), 1);
    match &decoded.stop_reason {
        StopReason::IncompleteSizePrefix { prefix } => assert_eq!(prefix, &[0x10, 0x00]),
        other => panic!("expected IncompleteSizePrefix, got {other:?}"),
    }
}

#[test]
fn large_packet_uses_four_byte_prefix() {
    let payload = vec![0x5A; 0x20_0000];
    let stream = ReplayBuilder::new()
        .absolute(PacketType::Ecs, 7, &payload)
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    assert_eq!(decoded.packets.len(), 1);
    let packet = &decoded.packets[0];
    assert_eq!(packet.prefix_len, 4);
    assert_eq!(packet.declared_len, 0x20_0005);
    assert_eq!(packet.payload_len, 0x20_0000);
    assert!(!packet.is_truncated());
    assert_eq!(packet.body.as_ref().map(PacketBody::opaque_bytes).ok(), Some(&payload[..]));
    assert_eq!(decoded.summary.decompressed_bytes, 0x20_0005);
}

// ── Timestamps ────────────────────────────────────────────────────────────────

#[test]
fn continuation_headers_carry_previous_timestamp() {
    let stream = ReplayBuilder::new()
        .continuation(PacketType::NextSegment, &[])
        .absolute(PacketType::AircraftSmall, 2500, &[0x01])
        .continuation(PacketType::AircraftSmall, &[0x02])
        .absolute(PacketType::Unknown(0x2A), 2600, &[])
        .continuation(PacketType::Unknown(0x2A), &[0x03])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    let stamps: Vec<_> = decoded.packets.iter().map(PacketRecord::timestamp_ms).collect();
    assert_eq!(
        stamps,
        [Some(0), Some(2500), Some(2500), Some(2600), Some(2600)]
    );
    assert_eq!(
        decoded.packets[4].packet_type(),
        Some(PacketType::Unknown(0x2A))
    );
    assert_eq!(decoded.summary.last_timestamp_ms, 2600);
}

#[test]
fn absolute_header_cut_short_keeps_previous_timestamp() {
    let stream = ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 4000, &[])
        .framed(&[PacketType::Snapshot.wire_id(), 0x01, 0x02])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&stream);

    let cut = &decoded.packets[1];
    let header = cut.header.expect("header present");
    assert_eq!(header.form, TimestampForm::Truncated);
    assert_eq!(header.timestamp_ms, 4000);
    assert_eq!(cut.header_len(), 1);
    assert_eq!(cut.diagnostics, [Diagnostic::TruncatedTimestamp { available: 2 }]);
    assert_eq!(cut.payload_len, 0);
    assert_eq!(cut.received_len, 3);
    assert!(decoded.is_complete());
}

// ── Compression ───────────────────────────────────────────────────────────────

#[test]
fn corrupt_deflate_block_is_fatal() {
    let decoded = ReplayDecoder::decode_slice(&[0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert!(decoded.packets.is_empty());
    assert!(decoded.stop_reason.is_fatal());
    assert!(!decoded.is_complete());
}

#[test]
fn source_cut_mid_stream_is_truncated() {
    let full = ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 0, &[])
        .absolute(PacketType::Snapshot, 10, &[0x33; 200])
        .compress();
    let decoded = ReplayDecoder::decode_slice(&full[..full.len() - 4]);

    assert!(matches!(decoded.stop_reason, StopReason::TruncatedStream));
    assert!(!decoded.is_complete());
}

#[test]
fn bytes_after_stream_end_are_ignored() {
    let mut file = ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 0, &[])
        .continuation(PacketType::EndMarker, &[])
        .compress();
    let stream_len = file.len() as u64;
    file.extend_from_slice(b"host trailer, not part of the stream");

    let decoded = ReplayDecoder::decode_slice(&file);
    assert_eq!(decoded.packets.len(), 2);
    assert!(matches!(decoded.stop_reason, StopReason::EndOfStream));
    assert_eq!(decoded.summary.compressed_offset, stream_len);
}

#[test]
fn one_byte_reads_decode_identically() {
    let builder = wrpl_tests::basic_match();
    let compressed = builder.compress();

    let whole = ReplayDecoder::decode_slice(&compressed);
    let trickled = ReplayDecoder::decode(Trickle(&compressed));

    assert_eq!(whole.packets.len(), trickled.packets.len());
    for (a, b) in whole.packets.iter().zip(&trickled.packets) {
        assert_eq!(a.header, b.header);
        assert_eq!(a.body.as_ref().ok(), b.body.as_ref().ok());
        assert_eq!(a.diagnostics, b.diagnostics);
    }
    assert!(matches!(trickled.stop_reason, StopReason::EndOfStream));
    assert_eq!(
        trickled.summary.decompressed_bytes,
        whole.summary.decompressed_bytes
    );
}

#[test]
fn stored_and_compressed_streams_agree() {
    let builder = wrpl_tests::basic_match();
    let stored = ReplayDecoder::decode_slice(&zlib(
        builder.decompressed(),
        flate2::Compression::none(),
    ));
    let best = ReplayDecoder::decode_slice(&zlib(
        builder.decompressed(),
        flate2::Compression::best(),
    ));

    assert_eq!(types(&stored.packets), types(&best.packets));
    assert_eq!(stored.summary.packets, 8);
}

// ── Consumers ─────────────────────────────────────────────────────────────────

#[test]
fn sink_break_cancels_after_current_packet() {
    let compressed = wrpl_tests::basic_match().compress();
    let mut seen = Vec::new();
    let (summary, reason) = decode_with_sink(&compressed[..], &mut |record: PacketRecord| {
        let is_chat = record.packet_type() == Some(PacketType::Chat);
        seen.push(record.index);
        if is_chat {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(seen, [0, 1, 2, 3]);
    assert_eq!(summary.packets, 4);
    assert!(matches!(reason, StopReason::Cancelled));
    assert!(reason.is_clean());
}

#[test]
fn stream_cancel_is_final() {
    let compressed = wrpl_tests::basic_match().compress();
    let mut stream = PacketStream::new(&compressed[..]);
    assert!(stream.next().is_some());
    stream.cancel();
    assert!(stream.next().is_none());
    assert!(matches!(stream.stop_reason(), Some(StopReason::Cancelled)));

    let (summary, _) = stream.into_parts();
    assert_eq!(summary.packets, 1);
}
