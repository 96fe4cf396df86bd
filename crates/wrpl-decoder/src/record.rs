use std::fmt;

use wrpl_types::{DeserializeError, PacketBody, PacketType};
use wrpl_wire::PacketHeader;

use crate::error::DecodeError;

/// Non-fatal anomaly recorded against a single packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The stream ended inside the payload; `actual` bytes were decoded.
    TruncatedPacket { expected: usize, actual: usize },
    /// The header announced an absolute timestamp but only `available`
    /// of its four bytes were present.
    TruncatedTimestamp { available: usize },
    /// The size prefix declared a zero-length payload: no header at all.
    EmptyPacket,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedPacket { expected, actual } => {
                write!(f, "incomplete packet: expected {expected} bytes, got {actual}")
            }
            Self::TruncatedTimestamp { available } => {
                write!(f, "truncated timestamp: {available} of 4 bytes present")
            }
            Self::EmptyPacket => f.write_str("empty packet: no header"),
        }
    }
}

/// Everything decoded for one framed packet.
///
/// ```text
///   [ size prefix ][ header │ payload ............ ]
///    prefix_len     header_len  payload_len
///                  └──────── declared_len ─────────┘
/// ```
#[derive(Debug)]
pub struct PacketRecord {
    /// Zero-based position in the stream.
    pub index: usize,
    /// Compressed offset sampled before the packet's prefix was read.
    pub compressed_offset: u64,
    pub prefix_len: usize,
    /// Payload length the size prefix declared.
    pub declared_len: usize,
    /// `None` only for a zero-length packet.
    pub header: Option<PacketHeader>,
    /// Bytes after the header that were handed to the deserializer.
    pub payload_len: usize,
    /// Bytes actually read for this packet; below `declared_len` only
    /// when the stream ended inside it.
    pub received_len: usize,
    pub body: Result<PacketBody, DeserializeError>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PacketRecord {
    #[must_use]
    pub fn packet_type(&self) -> Option<PacketType> {
        self.header.map(|h| PacketType::from_wire_id(h.packet_type))
    }

    #[must_use]
    pub fn timestamp_ms(&self) -> Option<u32> {
        self.header.map(|h| h.timestamp_ms)
    }

    #[must_use]
    pub fn header_len(&self) -> usize {
        self.header.map_or(0, |h| h.header_len)
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::TruncatedPacket { .. }))
    }
}

/// Why a decode run ended.
#[derive(Debug)]
pub enum StopReason {
    /// The zlib end-of-stream marker was reached and every byte consumed.
    EndOfStream,
    /// The compressed source ran out before the end-of-stream marker.
    /// Every byte that could be inflated was consumed.
    TruncatedStream,
    /// The stream ended cleanly, but its last packet declared more bytes
    /// than remained. That packet was still emitted with what was read.
    TruncatedPacket { expected: usize, actual: usize },
    /// The size prefix used the reserved `11xxxxxx` pattern; framing is
    /// lost from here on.
    InvalidSizePrefix { prefix: Vec<u8> },
    /// The stream ended inside a multi-byte size prefix.
    IncompleteSizePrefix { prefix: Vec<u8> },
    /// A valid prefix was followed by no payload bytes at all.
    MissingPayload { declared_len: usize },
    /// The caller's sink asked to stop.
    Cancelled,
    /// A fatal decompression or I/O fault.
    Fatal(DecodeError),
}

impl StopReason {
    /// True when decoding ended without losing data: a complete stream,
    /// or a caller-requested stop.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Cancelled)
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => f.write_str("clean end of stream"),
            Self::TruncatedStream => {
                f.write_str("compressed stream truncated before its end marker")
            }
            Self::TruncatedPacket { expected, actual } => {
                write!(f, "stream ended inside packet: expected {expected} bytes, got {actual}")
            }
            Self::InvalidSizePrefix { prefix } => {
                write!(f, "invalid size prefix (bytes: {})", hex::encode(prefix))
            }
            Self::IncompleteSizePrefix { prefix } => {
                write!(f, "incomplete size prefix (bytes: {})", hex::encode(prefix))
            }
            Self::MissingPayload { declared_len } => {
                write!(f, "no payload data after size prefix (declared {declared_len} bytes)")
            }
            Self::Cancelled => f.write_str("stopped by caller"),
            Self::Fatal(e) => write!(f, "fatal: {e}"),
        }
    }
}

/// Counters threaded through the decode loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Packets emitted.
    pub packets: usize,
    /// Timestamp carried into the next continuation header.
    pub last_timestamp_ms: u32,
    /// Header + payload bytes received, size prefixes excluded.
    pub decompressed_bytes: u64,
    /// Compressed offset where decoding stopped.
    pub compressed_offset: u64,
}
