#![warn(clippy::pedantic)]

pub mod chat;
pub mod error;
pub mod generic;
pub mod mpi;
pub mod packet;
pub mod packet_type;

pub use chat::ChatPacket;
pub use error::DeserializeError;
pub use generic::GenericPacket;
pub use mpi::MpiPacket;
pub use packet::PacketBody;
pub use packet_type::PacketType;
