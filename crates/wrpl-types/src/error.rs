use wrpl_wire::WireError;

use crate::packet_type::PacketType;

/// Errors produced while deserializing a single packet payload.
///
/// These never stop the stream: the orchestrator attaches them to the
/// packet's record and moves on to the next frame.
///
/// ```text
/// ┌───────────────────────┬──────────────────────────────────────────┐
/// │ Variant               │ Cause                                    │
/// ├───────────────────────┼──────────────────────────────────────────┤
/// │ InsufficientData      │ payload shorter than a fixed field       │
/// │ InvalidFormat         │ field bytes present but malformed        │
/// │ BitstreamReadFailure  │ a declared bit-level field was cut short │
/// │ UnsupportedPacketType │ reserved; unknown types decode as opaque │
/// └───────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("insufficient data in packet payload: needed {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("invalid packet format: {reason}")]
    InvalidFormat { reason: &'static str },

    #[error("bitstream read operation failed: {0}")]
    BitstreamReadFailure(#[source] WireError),

    #[error("unsupported packet type for deserialization: {packet_type}")]
    UnsupportedPacketType { packet_type: PacketType },
}

impl From<WireError> for DeserializeError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::CompressedIntOverflow { .. } => Self::InvalidFormat {
                reason: "compressed length exceeds 16 bits",
            },
            other => Self::BitstreamReadFailure(other),
        }
    }
}
