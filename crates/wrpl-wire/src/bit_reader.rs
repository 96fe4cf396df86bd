use crate::error::WireError;

/// Bit-addressable reader over a packet payload.
///
/// Used by the chat deserializer, whose fields are bit-packed. Bits are
/// consumed most-significant first within each byte, so a run of whole
/// byte reads starting at bit 0 lines up with the underlying bytes.
///
/// ```text
///   byte 0            byte 1
///   7 6 5 4 3 2 1 0   7 6 5 4 3 2 1 0
///   ^ bit 0           ^ bit 8
/// ```
///
/// Every read checks the remaining bit count first. A failed read leaves
/// the position where it was for fixed-width reads; compressed integers
/// may have consumed some of their bytes before failing. Either way the
/// caller is expected to abandon the record.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    /// Total bits consumed so far.
    #[must_use]
    pub fn bits_read(&self) -> usize {
        self.bit_pos
    }

    #[must_use]
    pub fn unread_bits(&self) -> usize {
        self.buf.len() * 8 - self.bit_pos
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.unread_bits() == 0
    }

    fn ensure(&self, needed: usize) -> Result<(), WireError> {
        let available = self.unread_bits();
        if needed > available {
            return Err(WireError::BitstreamExhausted { needed, available });
        }
        Ok(())
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool, WireError> {
        self.ensure(1)?;
        let byte = self.buf[self.bit_pos / 8];
        let bit = byte & (0x80 >> (self.bit_pos % 8)) != 0;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read eight bits as a byte, whether or not the position is aligned.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        self.ensure(8)?;
        let idx = self.bit_pos / 8;
        let shift = self.bit_pos % 8;
        let byte = if shift == 0 {
            self.buf[idx]
        } else {
            (self.buf[idx] << shift) | (self.buf[idx + 1] >> (8 - shift))
        };
        self.bit_pos += 8;
        Ok(byte)
    }

    /// Read `len` whole bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, WireError> {
        self.ensure(len.saturating_mul(8))?;
        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            self.bit_pos += len * 8;
            return Ok(self.buf[start..start + len].to_vec());
        }
        (0..len).map(|_| self.read_u8()).collect()
    }

    /// Advance past `len` bytes without reading them.
    pub fn skip_bytes(&mut self, len: usize) -> Result<(), WireError> {
        let bits = len.saturating_mul(8);
        self.ensure(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    /// Read a compressed unsigned integer into 16 bits.
    ///
    /// Each byte carries seven value bits, least significant group first;
    /// the high bit says another byte follows. A 16-bit value needs at
    /// most three bytes.
    ///
    /// | Value  | Encoded bytes        |
    /// |--------|----------------------|
    /// | 0      | `[0x00]`             |
    /// | 3      | `[0x03]`             |
    /// | 127    | `[0x7F]`             |
    /// | 128    | `[0x80, 0x01]`       |
    /// | 65535  | `[0xFF, 0xFF, 0x03]` |
    ///
    /// # Errors
    ///
    /// - [`WireError::BitstreamExhausted`] if the stream ends mid-value.
    /// - [`WireError::CompressedIntOverflow`] if the value needs more
    ///   than 16 bits.
    pub fn read_compressed_u16(&mut self) -> Result<u16, WireError> {
        let value = self.read_compressed(u16::BITS)?;
        u16::try_from(value).map_err(|_| WireError::CompressedIntOverflow { max_bits: u16::BITS })
    }

    fn read_compressed(&mut self, max_bits: u32) -> Result<u64, WireError> {
        let max_groups = max_bits.div_ceil(7);
        let mut value = 0u64;

        for group in 0..max_groups {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * group);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(WireError::CompressedIntOverflow { max_bits })
    }
}
