use crate::error::Result;
use std::time::Duration;

/// One queued call against the bit-addressable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCommand {
    Exists { key: String },
    DeleteKey { key: String },
    GetBit { key: String, offset: u64 },
    SetBit { key: String, offset: u64, value: bool },
    CountSetBits { key: String },
    Expire { key: String, ttl: Duration },
}

/// Reply to a single batched command, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchReply {
    /// Key existence, or a bit value; `SetBit` replies with the previous bit
    Bit(bool),
    Count(u64),
    Done,
}

/// A queue of store commands executed in one round trip.
///
/// Transactional batches apply all-or-nothing; non-transactional ones may
/// interleave with concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    transactional: bool,
    commands: Vec<BatchCommand>,
}

impl Batch {
    pub fn new(transactional: bool) -> Self {
        Self {
            transactional,
            commands: Vec::new(),
        }
    }

    pub fn exists(&mut self, key: &str) -> &mut Self {
        self.commands.push(BatchCommand::Exists { key: key.into() });
        self
    }

    pub fn delete_key(&mut self, key: &str) -> &mut Self {
        self.commands
            .push(BatchCommand::DeleteKey { key: key.into() });
        self
    }

    pub fn get_bit(&mut self, key: &str, offset: u64) -> &mut Self {
        self.commands.push(BatchCommand::GetBit {
            key: key.into(),
            offset,
        });
        self
    }

    pub fn set_bit(&mut self, key: &str, offset: u64, value: bool) -> &mut Self {
        self.commands.push(BatchCommand::SetBit {
            key: key.into(),
            offset,
            value,
        });
        self
    }

    pub fn count_set_bits(&mut self, key: &str) -> &mut Self {
        self.commands
            .push(BatchCommand::CountSetBits { key: key.into() });
        self
    }

    pub fn expire(&mut self, key: &str, ttl: Duration) -> &mut Self {
        self.commands.push(BatchCommand::Expire {
            key: key.into(),
            ttl,
        });
        self
    }

    pub fn is_transactional(&self) -> bool {
        self.transactional
    }

    pub fn commands(&self) -> &[BatchCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Contract for the external bit-addressable key-value store.
///
/// A handle is injected at construction and shared by reference across
/// filters, so every method takes `&self`; implementations provide their
/// own interior synchronization. Store failures surface as
/// [`FilterError::StoreUnavailable`](crate::FilterError::StoreUnavailable)
/// and propagate unchanged; no local retries.
pub trait BitStore {
    fn key_exists(&self, key: &str) -> Result<bool>;

    fn delete_key(&self, key: &str) -> Result<()>;

    fn get_bit(&self, key: &str, offset: u64) -> Result<bool>;

    /// Sets one bit, growing the vector as needed; returns the previous
    /// value.
    fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool>;

    fn count_set_bits(&self, key: &str) -> Result<u64>;

    fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Executes a queued batch as one round trip, replies in call order.
    fn execute(&self, batch: Batch) -> Result<Vec<BatchReply>>;
}
