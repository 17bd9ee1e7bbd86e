use crate::error::{FilterError, Result};
use crate::storage::{Batch, BatchCommand, BatchReply, BitStore};
use bitvec::vec::BitVec;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

#[derive(Debug, Default)]
struct VectorEntry {
    bits: BitVec,
    expires_at: Option<SystemTime>,
}

impl VectorEntry {
    fn expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Reference in-memory implementation of [`BitStore`].
///
/// Keeps one growable bit vector per key behind a single mutex, which also
/// makes every batch atomic here; the transactional flag only matters for
/// stores with real round trips. Expired vectors are dropped lazily on the
/// next access to their key.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    vectors: Mutex<HashMap<String, VectorEntry>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_vectors<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, VectorEntry>) -> T,
    ) -> Result<T> {
        let mut vectors = self.vectors.lock().map_err(|e| {
            FilterError::StoreUnavailable(format!("storage lock poisoned: {e}"))
        })?;
        Ok(f(&mut vectors))
    }
}

fn prune_expired(
    vectors: &mut HashMap<String, VectorEntry>,
    key: &str,
    now: SystemTime,
) {
    if vectors.get(key).is_some_and(|entry| entry.expired(now)) {
        vectors.remove(key);
    }
}

fn apply(
    vectors: &mut HashMap<String, VectorEntry>,
    command: &BatchCommand,
    now: SystemTime,
) -> BatchReply {
    match command {
        BatchCommand::Exists { key } => {
            prune_expired(vectors, key, now);
            BatchReply::Bit(vectors.contains_key(key))
        }
        BatchCommand::DeleteKey { key } => {
            vectors.remove(key);
            BatchReply::Done
        }
        BatchCommand::GetBit { key, offset } => {
            prune_expired(vectors, key, now);
            let bit = vectors.get(key).is_some_and(|entry| {
                entry
                    .bits
                    .get(*offset as usize)
                    .map(|b| *b)
                    .unwrap_or(false)
            });
            BatchReply::Bit(bit)
        }
        BatchCommand::SetBit { key, offset, value } => {
            prune_expired(vectors, key, now);
            let entry = vectors.entry(key.clone()).or_default();
            let offset = *offset as usize;
            if offset >= entry.bits.len() {
                entry.bits.resize(offset + 1, false);
            }
            let previous = entry.bits[offset];
            entry.bits.set(offset, *value);
            BatchReply::Bit(previous)
        }
        BatchCommand::CountSetBits { key } => {
            prune_expired(vectors, key, now);
            let count = vectors
                .get(key)
                .map_or(0, |entry| entry.bits.count_ones() as u64);
            BatchReply::Count(count)
        }
        BatchCommand::Expire { key, ttl } => {
            prune_expired(vectors, key, now);
            if let Some(entry) = vectors.get_mut(key) {
                entry.expires_at = now.checked_add(*ttl);
            }
            BatchReply::Done
        }
    }
}

impl BitStore for InMemoryStorage {
    fn key_exists(&self, key: &str) -> Result<bool> {
        let command = BatchCommand::Exists { key: key.into() };
        self.with_vectors(|vectors| {
            matches!(
                apply(vectors, &command, SystemTime::now()),
                BatchReply::Bit(true)
            )
        })
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        self.with_vectors(|vectors| {
            vectors.remove(key);
        })
    }

    fn get_bit(&self, key: &str, offset: u64) -> Result<bool> {
        let command = BatchCommand::GetBit {
            key: key.into(),
            offset,
        };
        self.with_vectors(|vectors| {
            matches!(
                apply(vectors, &command, SystemTime::now()),
                BatchReply::Bit(true)
            )
        })
    }

    fn set_bit(&self, key: &str, offset: u64, value: bool) -> Result<bool> {
        let command = BatchCommand::SetBit {
            key: key.into(),
            offset,
            value,
        };
        self.with_vectors(|vectors| {
            matches!(
                apply(vectors, &command, SystemTime::now()),
                BatchReply::Bit(true)
            )
        })
    }

    fn count_set_bits(&self, key: &str) -> Result<u64> {
        let command = BatchCommand::CountSetBits { key: key.into() };
        self.with_vectors(|vectors| {
            match apply(vectors, &command, SystemTime::now()) {
                BatchReply::Count(count) => count,
                _ => 0,
            }
        })
    }

    fn set_expiry(&self, key: &str, ttl: std::time::Duration) -> Result<()> {
        let command = BatchCommand::Expire {
            key: key.into(),
            ttl,
        };
        self.with_vectors(|vectors| {
            apply(vectors, &command, SystemTime::now());
        })
    }

    fn execute(&self, batch: Batch) -> Result<Vec<BatchReply>> {
        let now = SystemTime::now();
        self.with_vectors(|vectors| {
            batch
                .commands()
                .iter()
                .map(|command| apply(vectors, command, now))
                .collect()
        })
    }
}
