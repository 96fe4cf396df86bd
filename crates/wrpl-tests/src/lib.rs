//! Fixture builder for replay streams.
//!
//! The decoder crates never encode anything; tests and benches build their
//! inputs here. [`ReplayBuilder`] assembles the decompressed packet stream
//! packet by packet, then compresses it with `flate2` and optionally wraps
//! it in a host file.
//!
//! ```text
//!   host file:  [ HOST_HEADER ][ zlib( prefix header payload | prefix header payload | ... ) ]
//! ```

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use wrpl_types::PacketType;

/// Stand-in for the bytes a real replay file carries before its compressed
/// stream. Contains no zlib signature.
pub const HOST_HEADER: &[u8; 16] = b"WRPLv1\0\0\x11\x11\x11\x11\x11\x11\x11\x11";

/// Shortest size prefix for `len`.
///
/// ```text
///   0..=63             10xxxxxx
///   ..=0x3FFF          01xxxxxx + 1 byte
///   ..=0x1F_FFFF       001xxxxx + 2 bytes
///   ..=0xFFF_FFFF      0001xxxx + 3 bytes
///   anything larger    00000000 + LE u32
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_size_prefix(len: u32) -> Vec<u8> {
    match len {
        0..=0x3F => vec![0x80 | len as u8],
        0x40..=0x3FFF => {
            let v = len ^ 0x4000;
            vec![(v >> 8) as u8, v as u8]
        }
        0x4000..=0x1F_FFFF => {
            let v = len ^ 0x20_0000;
            vec![(v >> 16) as u8, (v >> 8) as u8, v as u8]
        }
        0x20_0000..=0xFFF_FFFF => {
            let v = len ^ 0x1000_0000;
            vec![(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8]
        }
        _ => {
            let mut out = vec![0x00];
            out.extend_from_slice(&len.to_le_bytes());
            out
        }
    }
}

/// Seven bits per byte, least significant group first, high bit set on
/// every byte but the last.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_compressed_u16(value: u16) -> Vec<u8> {
    let mut value = u32::from(value);
    let mut out = Vec::with_capacity(3);
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

/// A chat payload with every field present.
///
/// # Panics
///
/// If `sender` or `message` is longer than `u16::MAX` bytes.
#[must_use]
pub fn chat_payload(sender: &[u8], message: &[u8], channel_id: u8, is_enemy: bool) -> Vec<u8> {
    let mut out = encode_compressed_u16(0);
    for field in [sender, message] {
        let len = u16::try_from(field.len()).expect("chat field longer than u16::MAX");
        out.extend(encode_compressed_u16(len));
        out.extend_from_slice(field);
    }
    out.push(channel_id);
    out.push(if is_enemy { 0x80 } else { 0x00 });
    out
}

/// Compress `data` into a complete zlib stream.
///
/// # Panics
///
/// Never in practice; writing into a `Vec` cannot fail.
#[must_use]
pub fn zlib(data: &[u8], level: Compression) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), level);
    enc.write_all(data).expect("in-memory write");
    enc.finish().expect("in-memory write")
}

/// Builds a decompressed packet stream.
///
/// Packet types whose wire id has bit `0x10` set cannot use the absolute
/// timestamp form; the decoder would read them as continuation headers.
#[derive(Clone, Debug, Default)]
pub struct ReplayBuilder {
    stream: Vec<u8>,
}

impl ReplayBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A packet carrying an absolute timestamp.
    ///
    /// # Panics
    ///
    /// If the packet is longer than `u32::MAX` bytes.
    #[must_use]
    pub fn absolute(self, packet_type: PacketType, timestamp_ms: u32, payload: &[u8]) -> Self {
        let mut packet = vec![packet_type.wire_id()];
        packet.extend_from_slice(&timestamp_ms.to_le_bytes());
        packet.extend_from_slice(payload);
        self.framed(&packet)
    }

    /// A packet reusing the previous packet's timestamp.
    #[must_use]
    pub fn continuation(self, packet_type: PacketType, payload: &[u8]) -> Self {
        let mut packet = vec![packet_type.wire_id() ^ 0x10];
        packet.extend_from_slice(payload);
        self.framed(&packet)
    }

    /// An MPI packet.
    #[must_use]
    pub fn mpi(self, timestamp_ms: Option<u32>, object_id: u16, message_id: u16, tail: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(4 + tail.len());
        payload.extend_from_slice(&object_id.to_le_bytes());
        payload.extend_from_slice(&message_id.to_le_bytes());
        payload.extend_from_slice(tail);
        self.typed(PacketType::Mpi, timestamp_ms, &payload)
    }

    /// A chat packet with every field present.
    #[must_use]
    pub fn chat(
        self,
        timestamp_ms: Option<u32>,
        sender: &str,
        message: &str,
        channel_id: u8,
        is_enemy: bool,
    ) -> Self {
        let payload = chat_payload(sender.as_bytes(), message.as_bytes(), channel_id, is_enemy);
        self.typed(PacketType::Chat, timestamp_ms, &payload)
    }

    /// A size prefix followed by `packet` (header included).
    ///
    /// # Panics
    ///
    /// If `packet` is longer than `u32::MAX` bytes.
    #[must_use]
    pub fn framed(mut self, packet: &[u8]) -> Self {
        let len = u32::try_from(packet.len()).expect("packet longer than u32::MAX");
        self.stream.extend(encode_size_prefix(len));
        self.stream.extend_from_slice(packet);
        self
    }

    /// Bytes appended as-is, for malformed framing.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.stream.extend_from_slice(bytes);
        self
    }

    /// The decompressed stream built so far.
    #[must_use]
    pub fn decompressed(&self) -> &[u8] {
        &self.stream
    }

    /// The stream as a complete zlib stream.
    #[must_use]
    pub fn compress(&self) -> Vec<u8> {
        zlib(&self.stream, Compression::default())
    }

    /// [`HOST_HEADER`] followed by the stream stored uncompressed
    /// (zlib level 0, header `78 01`).
    #[must_use]
    pub fn host_file(&self) -> Vec<u8> {
        let mut out = HOST_HEADER.to_vec();
        out.extend(zlib(&self.stream, Compression::none()));
        out
    }

    fn typed(self, packet_type: PacketType, timestamp_ms: Option<u32>, payload: &[u8]) -> Self {
        match timestamp_ms {
            Some(ts) => self.absolute(packet_type, ts, payload),
            None => self.continuation(packet_type, payload),
        }
    }
}

/// The replay behind `tests/golden/basic_match.wrpl`.
#[must_use]
pub fn basic_match() -> ReplayBuilder {
    let ecs_state: Vec<u8> = (0..70).collect();
    ReplayBuilder::new()
        .absolute(PacketType::StartMarker, 0, &[])
        .continuation(PacketType::ReplayHeaderInfo, &[1, 2, 3])
        .mpi(Some(1000), 0x1234, 0x5678, &[0xAA, 0xBB])
        .chat(None, "pilot_one", "gl hf", 1, false)
        .chat(Some(61_250), "red_five", "o7", 2, true)
        .continuation(PacketType::Ecs, &ecs_state)
        .absolute(PacketType::Unknown(0x2A), 65_000, &[0xDE, 0xAD])
        .continuation(PacketType::EndMarker, &[])
}

/// The replay behind `tests/golden/truncated_packet.wrpl`: the last packet
/// declares 40 bytes but the stream ends after 8.
#[must_use]
pub fn truncated_packet() -> ReplayBuilder {
    ReplayBuilder::new()
        .mpi(Some(5), 1, 2, &[])
        .raw(&[0xA8, 0x17, 1, 2, 3, 4, 5, 6, 7])
}
