#![warn(clippy::pedantic)]

pub mod bit_reader;
pub mod cursor;
pub mod error;
pub mod packet_header;
pub mod size_prefix;

pub use bit_reader::BitReader;
pub use cursor::ByteCursor;
pub use error::WireError;
pub use packet_header::{PacketHeader, TimestampForm};
pub use size_prefix::SizePrefix;
