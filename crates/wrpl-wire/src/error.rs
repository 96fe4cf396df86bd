/// Errors raised by the byte- and bit-level readers in this crate.
///
/// The byte-aligned codecs (size prefix, packet header) never fail hard:
/// they report "no result" with `Option` and leave the decision to the
/// caller. `WireError` is what the fallible primitives underneath the
/// typed deserializers return.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A bit-level read asked for more bits than remain unread.
    #[error("bitstream exhausted: needed {needed} bits, {available} available")]
    BitstreamExhausted { needed: usize, available: usize },

    /// A compressed integer carried more significant bits than its
    /// destination type holds.
    #[error("compressed integer does not fit in {max_bits} bits")]
    CompressedIntOverflow { max_bits: u32 },
}
