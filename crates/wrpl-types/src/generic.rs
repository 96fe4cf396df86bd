/// Opaque passthrough for every packet type without a dedicated
/// deserializer (game state, snapshots, markers, unknown types).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenericPacket {
    pub raw_payload: Vec<u8>,
}

impl GenericPacket {
    /// Always succeeds; the payload is copied byte-for-byte.
    #[must_use]
    pub fn decode_body(buf: &[u8]) -> Self {
        Self {
            raw_payload: buf.to_vec(),
        }
    }
}
