use rotating_bloom_rs::{
    Batch, BatchCommand, BatchReply, BitStore, InMemoryStorage, Result,
};
use std::sync::Mutex;
use std::time::Duration;

/// A recorded `execute` call: the transactional flag plus the queued
/// commands, in call order.
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub transactional: bool,
    pub commands: Vec<BatchCommand>,
}

/// Wraps the in-memory store and records every executed batch so tests can
/// assert on batching and transactionality.
#[derive(Default)]
pub struct RecordingStorage {
    inner: InMemoryStorage,
    batches: Mutex<Vec<RecordedBatch>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn recorded_batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn clear_recording(&self) {
        self.batches.lock().unwrap().clear();
    }
}

impl BitStore for RecordingStorage {
    fn key_exists(&self, key: &str) -> Result<bool> {
        self.inner.key_exists(key)
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        self.inner.delete_key(key)
    }

    fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        self.inner.get_bit(key, offset)
    }

    fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool> {
        self.inner.set_bit(key, offset, value)
    }

    fn count_set_bits(&self, key: &str) -> Result<u64> {
        self.inner.count_set_bits(key)
    }

    fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
        self.inner.set_expiry(key, ttl)
    }

    fn execute(&self, batch: Batch) -> Result<Vec<BatchReply>> {
        self.batches.lock().unwrap().push(RecordedBatch {
            transactional: batch.is_transactional(),
            commands: batch.commands().to_vec(),
        });
        self.inner.execute(batch)
    }
}
