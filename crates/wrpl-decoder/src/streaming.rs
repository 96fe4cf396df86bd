use std::io::Read;

use wrpl_types::{DeserializeError, PacketBody, PacketType};
use wrpl_wire::packet_header::decode_packet_header;
use wrpl_wire::size_prefix::{MAX_SIZE_PREFIX_LEN, decode_size_prefix};
use wrpl_wire::{ByteCursor, TimestampForm};

use crate::decompression::InflateReader;
use crate::error::DecodeError;
use crate::record::{Diagnostic, PacketRecord, RunSummary, StopReason};

/// Pull-based packet decoder over a zlib-compressed replay stream.
///
/// Each call to [`next`](Iterator::next) decodes exactly one framed packet:
///
/// ```text
///   read 5 speculative bytes ─▶ size prefix ─▶ prepend unused tail
///        ─▶ read declared_len bytes ─▶ packet header ─▶ payload body
/// ```
///
/// Iteration ends at the first stop condition; [`stop_reason`](Self::stop_reason)
/// then says why. Per-packet problems (a short payload, a body that fails
/// to deserialize) are attached to the record and never end the stream.
/// Dropping the stream at any packet boundary releases the inflater.
pub struct PacketStream<R> {
    inflate: InflateReader<R>,
    summary: RunSummary,
    stop: Option<StopReason>,
    /// `(declared, received)` for a packet cut short by the end of output.
    cut_packet: Option<(usize, usize)>,
}

enum Step {
    Packet(PacketRecord),
    Stop(StopReason),
}

impl<R: Read> PacketStream<R> {
    /// Decode from `source`, positioned at the zlib stream's first byte.
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::with_base_offset(source, 0)
    }

    /// Like [`new`](Self::new), reporting compressed offsets relative to
    /// `base_offset`, the stream's position in its host file.
    #[must_use]
    pub fn with_base_offset(source: R, base_offset: u64) -> Self {
        Self {
            inflate: InflateReader::with_base_offset(source, base_offset),
            summary: RunSummary {
                compressed_offset: base_offset,
                ..RunSummary::default()
            },
            stop: None,
            cut_packet: None,
        }
    }

    /// Why iteration ended, or `None` while packets may still follow.
    #[must_use]
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Stop at the current packet boundary. Later calls to `next` return
    /// `None` and the stop reason becomes [`StopReason::Cancelled`].
    pub fn cancel(&mut self) {
        if self.stop.is_none() {
            self.finish(StopReason::Cancelled);
        }
    }

    /// Consume the stream, returning its counters and the stop reason.
    /// A stream abandoned before it stopped reports `Cancelled`.
    #[must_use]
    pub fn into_parts(mut self) -> (RunSummary, StopReason) {
        self.cancel();
        let reason = self.stop.take().unwrap_or(StopReason::Cancelled);
        (self.summary, reason)
    }

    fn finish(&mut self, reason: StopReason) {
        self.summary.compressed_offset = self.inflate.tell();
        match &reason {
            StopReason::EndOfStream | StopReason::Cancelled => {}
            StopReason::Fatal(e) => tracing::error!("decoding aborted: {e}"),
            other => tracing::warn!(packets = self.summary.packets, "decoding stopped: {other}"),
        }
        tracing::info!(
            packets = self.summary.packets,
            decompressed_bytes = self.summary.decompressed_bytes,
            last_timestamp_ms = self.summary.last_timestamp_ms,
            compressed_offset = self.summary.compressed_offset,
            "end of stream: {reason}"
        );
        self.stop = Some(reason);
    }

    fn end_reason(&self) -> StopReason {
        match (self.inflate.reached_stream_end(), self.cut_packet) {
            (false, _) => StopReason::TruncatedStream,
            (true, Some((expected, actual))) => StopReason::TruncatedPacket { expected, actual },
            (true, None) => StopReason::EndOfStream,
        }
    }

    fn step(&mut self) -> Result<Step, DecodeError> {
        if self.inflate.is_eof()? {
            return Ok(Step::Stop(self.end_reason()));
        }

        let compressed_offset = self.inflate.tell();
        let head = self.inflate.read(MAX_SIZE_PREFIX_LEN)?;
        if head.is_empty() {
            return Ok(Step::Stop(self.end_reason()));
        }

        let mut cursor = ByteCursor::new(&head);
        let Some(prefix) = decode_size_prefix(&mut cursor) else {
            return Ok(Step::Stop(StopReason::IncompleteSizePrefix { prefix: head }));
        };
        let Some(declared_len) = prefix.payload_len() else {
            return Ok(Step::Stop(StopReason::InvalidSizePrefix { prefix: head }));
        };
        self.inflate.prepend(cursor.remaining());

        let index = self.summary.packets;
        if declared_len == 0 {
            tracing::warn!(index, compressed_offset, "empty packet: no header");
            return Ok(Step::Packet(PacketRecord {
                index,
                compressed_offset,
                prefix_len: prefix.prefix_len,
                declared_len,
                header: None,
                payload_len: 0,
                received_len: 0,
                body: Err(DeserializeError::InsufficientData {
                    needed: 1,
                    available: 0,
                }),
                diagnostics: vec![Diagnostic::EmptyPacket],
            }));
        }

        let packet = self.inflate.read(declared_len)?;
        let mut cursor = ByteCursor::new(&packet);
        let Some(header) = decode_packet_header(&mut cursor, self.summary.last_timestamp_ms)
        else {
            return Ok(Step::Stop(StopReason::MissingPayload { declared_len }));
        };

        let mut diagnostics = Vec::new();
        if packet.len() < declared_len {
            self.cut_packet = Some((declared_len, packet.len()));
            diagnostics.push(Diagnostic::TruncatedPacket {
                expected: declared_len,
                actual: packet.len(),
            });
        }
        if header.form == TimestampForm::Truncated {
            diagnostics.push(Diagnostic::TruncatedTimestamp {
                available: packet.len() - 1,
            });
        }
        for diagnostic in &diagnostics {
            tracing::warn!(index, compressed_offset, "{diagnostic}");
        }

        self.summary.last_timestamp_ms = header.timestamp_ms;

        let payload = cursor.remaining();
        let packet_type = PacketType::from_wire_id(header.packet_type);
        let body = PacketBody::decode_body(packet_type, payload);
        if let Err(e) = &body {
            tracing::warn!(index, %packet_type, "failed to deserialize packet: {e}");
        }

        tracing::debug!(
            index,
            %packet_type,
            timestamp_ms = header.timestamp_ms,
            header_len = header.header_len,
            payload_len = payload.len(),
            compressed_offset,
            "decoded packet"
        );

        Ok(Step::Packet(PacketRecord {
            index,
            compressed_offset,
            prefix_len: prefix.prefix_len,
            declared_len,
            header: Some(header),
            payload_len: payload.len(),
            received_len: packet.len(),
            body,
            diagnostics,
        }))
    }
}

impl<R: Read> Iterator for PacketStream<R> {
    type Item = PacketRecord;

    fn next(&mut self) -> Option<PacketRecord> {
        if self.stop.is_some() {
            return None;
        }
        match self.step() {
            Ok(Step::Packet(record)) => {
                self.summary.packets += 1;
                self.summary.decompressed_bytes += record.received_len as u64;
                self.summary.compressed_offset = self.inflate.tell();
                Some(record)
            }
            Ok(Step::Stop(reason)) => {
                self.finish(reason);
                None
            }
            Err(e) => {
                self.finish(StopReason::Fatal(e));
                None
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for PacketStream<R> {}
