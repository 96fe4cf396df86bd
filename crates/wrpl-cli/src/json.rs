//! Serializable views of decoder output for `wrpl inspect --json`.

use serde::Serialize;
use wrpl_decoder::{PacketRecord, RunSummary, StopReason};
use wrpl_types::PacketBody;

#[derive(Serialize)]
pub struct ReplayView {
    pub stream_offset: usize,
    pub packets: Vec<PacketView>,
    pub summary: SummaryView,
}

#[derive(Serialize)]
pub struct SummaryView {
    pub packets: usize,
    pub last_timestamp_ms: u32,
    pub decompressed_bytes: u64,
    pub compressed_offset: u64,
    pub stop_reason: String,
    pub clean: bool,
}

impl SummaryView {
    pub fn new(summary: &RunSummary, reason: &StopReason) -> Self {
        Self {
            packets: summary.packets,
            last_timestamp_ms: summary.last_timestamp_ms,
            decompressed_bytes: summary.decompressed_bytes,
            compressed_offset: summary.compressed_offset,
            stop_reason: reason.to_string(),
            clean: reason.is_clean(),
        }
    }
}

#[derive(Serialize)]
pub struct PacketView {
    pub index: usize,
    pub compressed_offset: u64,
    pub prefix_len: usize,
    pub declared_len: usize,
    pub received_len: usize,
    pub packet_type: Option<String>,
    pub type_id: Option<u8>,
    pub timestamp_ms: Option<u32>,
    pub header_len: usize,
    pub payload_len: usize,
    pub body: BodyView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyView {
    Chat {
        sender: String,
        message: String,
        channel_id: u8,
        is_enemy: bool,
    },
    Mpi {
        object_id: u16,
        message_id: u16,
        payload_hex: String,
    },
    Generic {
        payload_hex: String,
    },
    Error {
        message: String,
    },
}

impl From<&PacketRecord> for PacketView {
    fn from(record: &PacketRecord) -> Self {
        let body = match &record.body {
            Ok(PacketBody::Chat(chat)) => BodyView::Chat {
                sender: chat.sender_lossy().into_owned(),
                message: chat.message_lossy().into_owned(),
                channel_id: chat.channel_id,
                is_enemy: chat.is_enemy,
            },
            Ok(PacketBody::Mpi(mpi)) => BodyView::Mpi {
                object_id: mpi.object_id,
                message_id: mpi.message_id,
                payload_hex: hex::encode(&mpi.payload),
            },
            Ok(PacketBody::Generic(generic)) => BodyView::Generic {
                payload_hex: hex::encode(&generic.raw_payload),
            },
            Err(e) => BodyView::Error {
                message: e.to_string(),
            },
        };

        Self {
            index: record.index,
            compressed_offset: record.compressed_offset,
            prefix_len: record.prefix_len,
            declared_len: record.declared_len,
            received_len: record.received_len,
            packet_type: record.packet_type().map(|t| t.to_string()),
            type_id: record.header.map(|h| h.packet_type),
            timestamp_ms: record.timestamp_ms(),
            header_len: record.header_len(),
            payload_len: record.payload_len,
            body,
            warnings: record.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}
