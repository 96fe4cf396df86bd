use std::fmt;

/// Replay packet type identifiers.
///
/// The wire carries the type as the header's leading byte (after the
/// continuation flag is stripped). Values without a name are kept as
/// `Unknown(u8)` so nothing is ever rejected for its type alone.
///
/// ```text
/// ┌──────┬──────────────────┬─────────────────────────────────────┐
/// │ Wire │ Variant          │ Payload                             │
/// ├──────┼──────────────────┼─────────────────────────────────────┤
/// │ 0x00 │ EndMarker        │ opaque                              │
/// │ 0x01 │ StartMarker      │ opaque                              │
/// │ 0x02 │ AircraftSmall    │ opaque                              │
/// │ 0x03 │ Chat             │ bit-packed sender/message/channel   │
/// │ 0x04 │ Mpi              │ object id, message id, opaque tail  │
/// │ 0x05 │ NextSegment      │ opaque                              │
/// │ 0x06 │ Ecs              │ opaque                              │
/// │ 0x07 │ Snapshot         │ opaque                              │
/// │ 0x08 │ ReplayHeaderInfo │ opaque                              │
/// └──────┴──────────────────┴─────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketType {
    EndMarker,
    StartMarker,
    AircraftSmall,
    Chat,
    Mpi,
    NextSegment,
    Ecs,
    Snapshot,
    ReplayHeaderInfo,
    /// Any other wire value, preserved as-is.
    Unknown(u8),
}

impl PacketType {
    /// Every named variant, in wire order.
    pub const KNOWN: [Self; 9] = [
        Self::EndMarker,
        Self::StartMarker,
        Self::AircraftSmall,
        Self::Chat,
        Self::Mpi,
        Self::NextSegment,
        Self::Ecs,
        Self::Snapshot,
        Self::ReplayHeaderInfo,
    ];

    #[must_use]
    pub fn wire_id(self) -> u8 {
        match self {
            Self::EndMarker => 0,
            Self::StartMarker => 1,
            Self::AircraftSmall => 2,
            Self::Chat => 3,
            Self::Mpi => 4,
            Self::NextSegment => 5,
            Self::Ecs => 6,
            Self::Snapshot => 7,
            Self::ReplayHeaderInfo => 8,
            Self::Unknown(id) => id,
        }
    }

    #[must_use]
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            0 => Self::EndMarker,
            1 => Self::StartMarker,
            2 => Self::AircraftSmall,
            3 => Self::Chat,
            4 => Self::Mpi,
            5 => Self::NextSegment,
            6 => Self::Ecs,
            7 => Self::Snapshot,
            8 => Self::ReplayHeaderInfo,
            other => Self::Unknown(other),
        }
    }

    /// Snake-case name, or `None` for an unknown type.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::EndMarker => "end_marker",
            Self::StartMarker => "start_marker",
            Self::AircraftSmall => "aircraft_small",
            Self::Chat => "chat",
            Self::Mpi => "mpi",
            Self::NextSegment => "next_segment",
            Self::Ecs => "ecs",
            Self::Snapshot => "snapshot",
            Self::ReplayHeaderInfo => "replay_header_info",
            Self::Unknown(_) => return None,
        })
    }

    /// Parse a name as produced by [`name`](Self::name). Accepts
    /// `unknown(N)` / a bare number for unnamed types.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(known) = Self::KNOWN.iter().find(|t| t.name() == Some(name)) {
            return Some(*known);
        }
        let digits = name
            .strip_prefix("unknown(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(name);
        digits.trim().parse::<u8>().ok().map(Self::from_wire_id)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown ({})", self.wire_id()),
        }
    }
}
