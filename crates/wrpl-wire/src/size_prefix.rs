use crate::cursor::ByteCursor;

/// Longest possible size prefix: one leading byte plus four extra bytes.
///
/// The stream reader speculatively pulls this many bytes before it knows
/// which form the prefix uses, then pushes the unused tail back.
pub const MAX_SIZE_PREFIX_LEN: usize = 5;

/// Sentinel payload size reported for a reserved/invalid prefix.
pub const INVALID_PAYLOAD_SIZE: i64 = -1;

/// Decoded packet size prefix.
///
/// `payload_size` is [`INVALID_PAYLOAD_SIZE`] when the leading byte used
/// the reserved `11xxxxxx` pattern. That is not a hard error here; the
/// caller decides whether to abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizePrefix {
    pub payload_size: i64,
    pub prefix_len: usize,
}

impl SizePrefix {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.payload_size >= 0
    }

    /// The payload length as a `usize`, or `None` for an invalid prefix.
    #[must_use]
    pub fn payload_len(self) -> Option<usize> {
        usize::try_from(self.payload_size).ok()
    }
}

/// Decode the variable-length size prefix at the cursor.
///
/// The form is selected by the high bits of the leading byte:
///
/// ```text
/// ┌──────────────┬───────┬────────────────────────────────────────────────┐
/// │ Leading byte │ Extra │ Value                                          │
/// ├──────────────┼───────┼────────────────────────────────────────────────┤
/// │ 10xxxxxx     │ 0     │ lead & 0x7F                                    │
/// │ 11xxxxxx     │ -     │ reserved → payload_size = -1, 1 byte           │
/// │ 01xxxxxx     │ 1     │ (lead<<8 | b0) ^ 0x4000                        │
/// │ 001xxxxx     │ 2     │ (lead<<16 | b0<<8 | b1) ^ 0x200000             │
/// │ 0001xxxx     │ 3     │ (lead<<24 | b0<<16 | b1<<8 | b2) ^ 0x1000_0000 │
/// │ 0000xxxx     │ 4     │ u32::from_le_bytes([b0, b1, b2, b3])           │
/// └──────────────┴───────┴────────────────────────────────────────────────┘
/// ```
///
/// Returns `None` when the cursor runs out before the leading byte or any
/// required extra byte; the stream reader treats that as end-of-stream.
pub fn decode_size_prefix(cursor: &mut ByteCursor<'_>) -> Option<SizePrefix> {
    let lead = cursor.read_u8()?;

    if lead & 0x80 != 0 {
        if lead & 0x40 != 0 {
            tracing::warn!("invalid size prefix leading byte: {lead:#04x}");
            return Some(SizePrefix {
                payload_size: INVALID_PAYLOAD_SIZE,
                prefix_len: 1,
            });
        }
        return Some(SizePrefix {
            payload_size: i64::from(lead & 0x7F),
            prefix_len: 1,
        });
    }

    let lead32 = u32::from(lead);
    let (value, extra) = if lead & 0x40 != 0 {
        let b = read_exact::<1>(cursor)?;
        (((lead32 << 8) | u32::from(b[0])) ^ 0x4000, 1)
    } else if lead & 0x20 != 0 {
        let b = read_exact::<2>(cursor)?;
        (
            ((lead32 << 16) | (u32::from(b[0]) << 8) | u32::from(b[1])) ^ 0x20_0000,
            2,
        )
    } else if lead & 0x10 != 0 {
        let b = read_exact::<3>(cursor)?;
        (
            ((lead32 << 24) | (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]))
                ^ 0x1000_0000,
            3,
        )
    } else {
        // The leading byte's low nibble is not part of the value here.
        (u32::from_le_bytes(read_exact::<4>(cursor)?), 4)
    };

    Some(SizePrefix {
        payload_size: i64::from(value),
        prefix_len: 1 + extra,
    })
}

fn read_exact<const N: usize>(cursor: &mut ByteCursor<'_>) -> Option<[u8; N]> {
    cursor.read(N).try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Option<SizePrefix> {
        decode_size_prefix(&mut ByteCursor::new(bytes))
    }

    #[test]
    fn one_byte_form_for_every_valid_leading_byte() {
        for lead in 0x80u8..=0xBF {
            let prefix = decode(&[lead]).unwrap();
            assert_eq!(prefix.payload_size, i64::from(lead & 0x7F), "lead {lead:#04x}");
            assert_eq!(prefix.prefix_len, 1);
        }
    }

    #[test]
    fn reserved_leading_bits_report_invalid() {
        for lead in 0xC0u8..=0xFF {
            let prefix = decode(&[lead, 0x00, 0x00, 0x00, 0x00]).unwrap();
            assert_eq!(prefix.payload_size, INVALID_PAYLOAD_SIZE);
            assert_eq!(prefix.prefix_len, 1);
            assert!(!prefix.is_valid());
            assert_eq!(prefix.payload_len(), None);
        }
    }

    #[test]
    fn two_byte_form() {
        // 128 = 0x0080 → 0x4080
        assert_eq!(decode(&[0x40, 0x80]).unwrap(), SizePrefix { payload_size: 128, prefix_len: 2 });
        // 0x3FFF is the largest two-byte value
        assert_eq!(decode(&[0x7F, 0xFF]).unwrap().payload_size, 0x3FFF);
        assert_eq!(decode(&[0x40, 0x00]).unwrap().payload_size, 0);
    }

    #[test]
    fn three_byte_form() {
        assert_eq!(
            decode(&[0x20, 0x40, 0x00]).unwrap(),
            SizePrefix { payload_size: 0x4000, prefix_len: 3 }
        );
        assert_eq!(decode(&[0x3F, 0xFF, 0xFF]).unwrap().payload_size, 0x1F_FFFF);
    }

    #[test]
    fn four_byte_form() {
        assert_eq!(
            decode(&[0x10, 0x20, 0x00, 0x00]).unwrap(),
            SizePrefix { payload_size: 0x20_0000, prefix_len: 4 }
        );
        assert_eq!(decode(&[0x1F, 0xFF, 0xFF, 0xFF]).unwrap().payload_size, 0x0FFF_FFFF);
    }

    #[test]
    fn five_byte_form_is_little_endian_and_ignores_lead_nibble() {
        assert_eq!(
            decode(&[0x00, 0x00, 0x00, 0x00, 0x10]).unwrap(),
            SizePrefix { payload_size: 0x1000_0000, prefix_len: 5 }
        );
        assert_eq!(
            decode(&[0x0F, 0x78, 0x56, 0x34, 0x12]).unwrap().payload_size,
            0x1234_5678
        );
        assert_eq!(
            decode(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap().payload_size,
            i64::from(u32::MAX)
        );
    }

    #[test]
    fn leaves_trailing_bytes_unread() {
        let data = [0x85, 0xAA, 0xBB, 0xCC, 0xDD];
        let mut cursor = ByteCursor::new(&data);
        let prefix = decode_size_prefix(&mut cursor).unwrap();
        assert_eq!(prefix.payload_size, 5);
        assert_eq!(cursor.remaining(), &[0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn empty_input_has_no_result() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn missing_extra_bytes_have_no_result() {
        assert_eq!(decode(&[0x40]), None);
        assert_eq!(decode(&[0x20, 0x00]), None);
        assert_eq!(decode(&[0x10, 0x00, 0x00]), None);
        assert_eq!(decode(&[0x00, 0x00, 0x00, 0x00]), None);
    }
}
