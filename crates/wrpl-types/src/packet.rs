use crate::chat::ChatPacket;
use crate::error::DeserializeError;
use crate::generic::GenericPacket;
use crate::mpi::MpiPacket;
use crate::packet_type::PacketType;

/// Typed packet payload, selected by [`PacketType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketBody {
    Chat(ChatPacket),
    Mpi(MpiPacket),
    Generic(GenericPacket),
}

impl PacketBody {
    /// Dispatch the payload (the bytes after the packet header) to the
    /// deserializer for `packet_type`. Types without a dedicated
    /// deserializer, including unknown ones, become [`PacketBody::Generic`].
    ///
    /// # Errors
    ///
    /// Whatever the chosen deserializer reports; see [`ChatPacket::decode_body`]
    /// and [`MpiPacket::decode_body`].
    pub fn decode_body(packet_type: PacketType, buf: &[u8]) -> Result<Self, DeserializeError> {
        match packet_type {
            PacketType::Chat => ChatPacket::decode_body(buf).map(Self::Chat),
            PacketType::Mpi => MpiPacket::decode_body(buf).map(Self::Mpi),
            _ => Ok(Self::Generic(GenericPacket::decode_body(buf))),
        }
    }

    /// Bytes left opaque by the deserializer: the MPI tail or the whole
    /// generic payload. Chat packets have none.
    #[must_use]
    pub fn opaque_bytes(&self) -> &[u8] {
        match self {
            Self::Chat(_) => &[],
            Self::Mpi(mpi) => &mpi.payload,
            Self::Generic(generic) => &generic.raw_payload,
        }
    }
}
