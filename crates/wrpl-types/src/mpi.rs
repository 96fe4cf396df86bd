use crate::error::DeserializeError;

/// Fixed part of an MPI payload: object id + message id.
pub const MPI_HEADER_LEN: usize = 4;

/// MPI packet: a message addressed to a networked object.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────┐
/// │ Offset │ Size    │ Field                    │
/// ├────────┼─────────┼──────────────────────────┤
/// │ 0x00   │ 2 bytes │ object_id  (LE u16)      │
/// │ 0x02   │ 2 bytes │ message_id (LE u16)      │
/// │ 0x04   │ rest    │ payload (opaque)         │
/// └────────┴─────────┴──────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpiPacket {
    pub object_id: u16,
    pub message_id: u16,
    pub payload: Vec<u8>,
}

impl MpiPacket {
    /// # Errors
    ///
    /// [`DeserializeError::InsufficientData`] when fewer than four bytes
    /// are available.
    pub fn decode_body(buf: &[u8]) -> Result<Self, DeserializeError> {
        let Some((ids, payload)) = buf.split_first_chunk::<MPI_HEADER_LEN>() else {
            return Err(DeserializeError::InsufficientData {
                needed: MPI_HEADER_LEN,
                available: buf.len(),
            });
        };

        Ok(Self {
            object_id: u16::from_le_bytes([ids[0], ids[1]]),
            message_id: u16::from_le_bytes([ids[2], ids[3]]),
            payload: payload.to_vec(),
        })
    }
}
