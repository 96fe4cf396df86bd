#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod record;
pub mod sink;
pub mod streaming;

mod decompression;

pub use decoder::{DecodedReplay, ReplayDecoder};
pub use decompression::InflateReader;
pub use error::DecodeError;
pub use record::{Diagnostic, PacketRecord, RunSummary, StopReason};
pub use sink::{PacketSink, decode_with_sink};
pub use streaming::PacketStream;
