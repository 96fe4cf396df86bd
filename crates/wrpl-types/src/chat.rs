use std::borrow::Cow;

use wrpl_wire::BitReader;

use crate::error::DeserializeError;

/// CHAT packet: one in-game chat line.
///
/// The payload is bit-packed and read with a [`BitReader`]:
///
/// ```text
/// ┌───────────────────────┬──────────────────────────────────────────┐
/// │ Field                 │ Encoding                                 │
/// ├───────────────────────┼──────────────────────────────────────────┤
/// │ ignored_len, ignored  │ compressed u16, then that many bytes     │
/// │ sender_len, sender    │ compressed u16, then that many bytes     │
/// │ message_len, message  │ compressed u16, then that many bytes     │
/// │ channel_id            │ 8 bits, only if ≥ 8 bits remain          │
/// │ is_enemy              │ 1 bit, only if ≥ 1 bit remains           │
/// └───────────────────────┴──────────────────────────────────────────┘
/// ```
///
/// The leading blob's meaning is unknown; it is skipped, never kept.
/// Sender and message bytes are copied verbatim. They are usually UTF-8
/// but nothing guarantees it, so they stay as raw bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatPacket {
    pub sender_name: Vec<u8>,
    pub message: Vec<u8>,
    pub is_enemy: bool,
    pub channel_id: u8,
    /// Bits consumed from the payload by the fields above.
    pub bits_read: u32,
}

impl ChatPacket {
    /// Deserialize a chat payload (the bytes after the packet header).
    ///
    /// # Errors
    ///
    /// - [`DeserializeError::InsufficientData`] for an empty payload.
    /// - [`DeserializeError::BitstreamReadFailure`] when a field that is
    ///   present is cut short.
    /// - [`DeserializeError::InvalidFormat`] when a length does not fit
    ///   in 16 bits.
    pub fn decode_body(payload: &[u8]) -> Result<Self, DeserializeError> {
        if payload.is_empty() {
            return Err(DeserializeError::InsufficientData {
                needed: 1,
                available: 0,
            });
        }

        let mut reader = BitReader::new(payload);

        let ignored_len = reader.read_compressed_u16()?;
        reader.skip_bytes(usize::from(ignored_len))?;

        let sender_name = read_string(&mut reader)?;
        let message = read_string(&mut reader)?;

        let channel_id = if reader.unread_bits() >= 8 {
            reader.read_u8()?
        } else {
            0
        };
        let is_enemy = if reader.unread_bits() >= 1 {
            reader.read_bit()?
        } else {
            false
        };

        Ok(Self {
            sender_name,
            message,
            is_enemy,
            channel_id,
            bits_read: u32::try_from(reader.bits_read()).unwrap_or(u32::MAX),
        })
    }

    #[must_use]
    pub fn sender_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.sender_name)
    }

    #[must_use]
    pub fn message_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}

/// A length-prefixed string. A stream that ends exactly where the length
/// would start reads as an empty string.
fn read_string(reader: &mut BitReader<'_>) -> Result<Vec<u8>, DeserializeError> {
    if reader.is_exhausted() {
        return Ok(Vec::new());
    }
    let len = reader.read_compressed_u16()?;
    if len == 0 {
        return Ok(Vec::new());
    }
    Ok(reader.read_bytes(usize::from(len))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrpl_wire::WireError;

    #[test]
    fn decodes_all_fields() {
        let payload = [
            0x00, // ignored_len
            0x03, b'B', b'o', b'b', // sender
            0x02, b'h', b'i', // message
            0x02,        // channel
            0b1000_0000, // is_enemy
        ];
        let chat = ChatPacket::decode_body(&payload).unwrap();
        assert_eq!(chat.sender_name, b"Bob");
        assert_eq!(chat.message, b"hi");
        assert_eq!(chat.channel_id, 2);
        assert!(chat.is_enemy);
        assert_eq!(chat.bits_read, 9 * 8 + 1);
    }

    #[test]
    fn ignored_blob_is_skipped() {
        let payload = [0x02, 0xDE, 0xAD, 0x01, b'X', 0x00];
        let chat = ChatPacket::decode_body(&payload).unwrap();
        assert_eq!(chat.sender_name, b"X");
        assert!(chat.message.is_empty());
        assert_eq!(chat.channel_id, 0);
        assert!(!chat.is_enemy);
    }

    #[test]
    fn payload_ending_after_sender_uses_defaults() {
        let payload = [0x00, 0x03, b'B', b'o', b'b'];
        let chat = ChatPacket::decode_body(&payload).unwrap();
        assert_eq!(chat.sender_lossy(), "Bob");
        assert!(chat.message.is_empty());
        assert_eq!(chat.channel_id, 0);
        assert!(!chat.is_enemy);
        assert_eq!(chat.bits_read, 5 * 8);
    }

    #[test]
    fn channel_without_enemy_bit() {
        let payload = [0x00, 0x00, 0x01, b'?', 0x07];
        let chat = ChatPacket::decode_body(&payload).unwrap();
        assert!(chat.sender_name.is_empty());
        assert_eq!(chat.message, b"?");
        assert_eq!(chat.channel_id, 7);
        assert!(!chat.is_enemy);
    }

    #[test]
    fn non_utf8_bytes_kept_verbatim() {
        let payload = [0x00, 0x02, 0xFF, 0xFE, 0x00];
        let chat = ChatPacket::decode_body(&payload).unwrap();
        assert_eq!(chat.sender_name, vec![0xFF, 0xFE]);
        assert_eq!(chat.sender_lossy(), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn empty_payload_is_insufficient() {
        assert!(matches!(
            ChatPacket::decode_body(&[]),
            Err(DeserializeError::InsufficientData { needed: 1, available: 0 })
        ));
    }

    #[test]
    fn declared_but_unreadable_message_length_fails() {
        // message_len has its continuation bit set and nothing follows
        let payload = [0x00, 0x03, b'B', b'o', b'b', 0x80];
        assert!(matches!(
            ChatPacket::decode_body(&payload),
            Err(DeserializeError::BitstreamReadFailure(WireError::BitstreamExhausted { .. }))
        ));
    }

    #[test]
    fn short_message_body_fails() {
        let payload = [0x00, 0x01, b'A', 0x05, b'h', b'i'];
        assert!(matches!(
            ChatPacket::decode_body(&payload),
            Err(DeserializeError::BitstreamReadFailure(_))
        ));
    }

    #[test]
    fn ignored_blob_past_end_fails() {
        assert!(matches!(
            ChatPacket::decode_body(&[0x10, 0x00]),
            Err(DeserializeError::BitstreamReadFailure(_))
        ));
    }

    #[test]
    fn oversized_length_is_invalid_format() {
        let payload = [0x00, 0xFF, 0xFF, 0xFF, 0x01];
        assert!(matches!(
            ChatPacket::decode_body(&payload),
            Err(DeserializeError::InvalidFormat { .. })
        ));
    }
}
