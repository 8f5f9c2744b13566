use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub sequence: u64,
    pub operation: String,
    pub detail: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPacket {
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub payload: Vec<u8>,
}

impl JournalPacket {
    pub fn from_records(sequence: u64, records: &[EditRecord]) -> Result<Self, JournalError> {
        let payload = serde_json::to_vec(records)?;
        Ok(Self {
            sequence,
            timestamp_ms: current_time_millis(),
            payload,
        })
    }

    pub fn decode(&self) -> Result<Vec<EditRecord>, JournalError> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to encode journal: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write journal file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default, Clone)]
pub struct EditJournal {
    next_sequence: u64,
    pending: Vec<EditRecord>,
    history: Vec<EditRecord>,
}

impl EditJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: impl Into<String>, detail: impl Into<String>) -> u64 {
        self.next_sequence += 1;
        let record = EditRecord {
            sequence: self.next_sequence,
            operation: operation.into(),
            detail: detail.into(),
            timestamp_ms: current_time_millis(),
        };
        self.pending.push(record.clone());
        self.history.push(record);
        self.next_sequence
    }

    pub fn drain_pending(&mut self) -> Vec<EditRecord> {
        self.pending.drain(..).collect()
    }

    pub fn last_recorded(&self) -> Option<&EditRecord> {
        self.history.last()
    }

    pub fn total_records(&self) -> usize {
        self.history.len()
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.history
    }

    pub fn export_packet(&self) -> Result<JournalPacket, JournalError> {
        JournalPacket::from_records(self.next_sequence, &self.history)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), JournalError> {
        let encoded = serde_json::to_vec_pretty(&self.history)?;
        std::fs::write(path, encoded)?;
        Ok(())
    }
}

fn current_time_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
