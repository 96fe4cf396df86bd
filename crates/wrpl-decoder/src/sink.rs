use std::io::Read;
use std::ops::ControlFlow;

use crate::record::{PacketRecord, RunSummary, StopReason};
use crate::streaming::PacketStream;

/// Receiver for decoded packets.
///
/// Returning [`ControlFlow::Break`] stops decoding at the current packet
/// boundary; the run then ends with [`StopReason::Cancelled`]. Any
/// `FnMut(PacketRecord) -> ControlFlow<()>` closure is a sink.
pub trait PacketSink {
    fn accept(&mut self, record: PacketRecord) -> ControlFlow<()>;
}

impl<F> PacketSink for F
where
    F: FnMut(PacketRecord) -> ControlFlow<()>,
{
    fn accept(&mut self, record: PacketRecord) -> ControlFlow<()> {
        self(record)
    }
}

/// Decode `source` and push every packet into `sink` as it is produced.
///
/// Nothing is buffered beyond the packet in flight.
pub fn decode_with_sink<R, S>(source: R, sink: &mut S) -> (RunSummary, StopReason)
where
    R: Read,
    S: PacketSink + ?Sized,
{
    let mut stream = PacketStream::new(source);
    while let Some(record) = stream.next() {
        if sink.accept(record).is_break() {
            stream.cancel();
            break;
        }
    }
    stream.into_parts()
}
