use crate::cursor::ByteCursor;

/// Bit in the leading header byte marking the continuation form.
pub const CONTINUATION_FLAG: u8 = 0x10;

/// Header length when an absolute timestamp follows the type byte.
pub const ABSOLUTE_HEADER_LEN: usize = 5;

/// How the timestamp of a packet header was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampForm {
    /// Bit 0x10 was set: the previous packet's timestamp carries over.
    Continuation,
    /// A little-endian `u32` timestamp followed the type byte.
    Absolute,
    /// The absolute form was announced but fewer than four timestamp
    /// bytes were present. The previous timestamp is reused.
    Truncated,
}

/// Packet header at the start of every packet payload.
///
/// ```text
/// continuation:  [ type | 0x10 ]                         1 byte
/// absolute:      [ type ] [ ts0 ts1 ts2 ts3 ] (LE u32)    5 bytes
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    pub packet_type: u8,
    pub timestamp_ms: u32,
    pub header_len: usize,
    pub form: TimestampForm,
}

impl PacketHeader {
    /// True when the header carried its own timestamp.
    #[must_use]
    pub fn has_absolute_timestamp(&self) -> bool {
        self.form == TimestampForm::Absolute
    }
}

/// Decode a packet header from the start of a packet payload.
///
/// `last_timestamp_ms` is the previous packet's timestamp; it is returned
/// unchanged for the continuation form and for a truncated absolute form.
/// Returns `None` only when the payload is empty.
pub fn decode_packet_header(
    cursor: &mut ByteCursor<'_>,
    last_timestamp_ms: u32,
) -> Option<PacketHeader> {
    let lead = cursor.read_u8()?;

    if lead & CONTINUATION_FLAG != 0 {
        return Some(PacketHeader {
            packet_type: lead ^ CONTINUATION_FLAG,
            timestamp_ms: last_timestamp_ms,
            header_len: 1,
            form: TimestampForm::Continuation,
        });
    }

    let ts = cursor.read(4);
    let Ok(ts) = <[u8; 4]>::try_from(ts) else {
        tracing::warn!(
            available = ts.len(),
            "unexpected end of packet while reading timestamp"
        );
        return Some(PacketHeader {
            packet_type: lead,
            timestamp_ms: last_timestamp_ms,
            header_len: 1,
            form: TimestampForm::Truncated,
        });
    };

    Some(PacketHeader {
        packet_type: lead,
        timestamp_ms: u32::from_le_bytes(ts),
        header_len: ABSOLUTE_HEADER_LEN,
        form: TimestampForm::Absolute,
    })
}
