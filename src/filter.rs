use crate::config::{FilterConfig, FilterParams};
use crate::error::{FilterError, Result};
use crate::hash::bit_offsets;
use crate::storage::{Batch, BatchReply, BitStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// One externally-stored bit vector addressed by k derived offsets.
///
/// Construction performs no store I/O; the vector is materialized on the
/// first write. Membership is monotone for the filter's life except for an
/// explicit [`reset`](Self::reset) or a best-effort [`delete`](Self::delete).
pub struct BloomFilter<S: BitStore> {
    store: Arc<S>,
    key: String,
    params: FilterParams,
    fill_max_ratio: f64,
    auto_reset: bool,
    add_count: AtomicU64,
    add_count_check: u64,
}

impl<S: BitStore> BloomFilter<S> {
    pub fn new(
        store: Arc<S>,
        key: impl Into<String>,
        config: &FilterConfig,
    ) -> Result<Self> {
        let params = config.params()?;
        Ok(Self::from_parts(store, key.into(), params, config))
    }

    pub(crate) fn from_parts(
        store: Arc<S>,
        key: String,
        params: FilterParams,
        config: &FilterConfig,
    ) -> Self {
        Self {
            store,
            key,
            params,
            fill_max_ratio: config.fill_max_ratio,
            auto_reset: config.auto_reset,
            add_count: AtomicU64::new(0),
            add_count_check: config.add_count_check,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Idempotently allocates the vector at full length by touching offset
    /// `bits`, one past the highest derivable offset, so no membership bit
    /// is disturbed. Safe under concurrent callers.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.store.key_exists(&self.key)? {
            self.store.set_bit(&self.key, self.params.bits, false)?;
        }
        Ok(())
    }

    /// Drops the stored vector and re-allocates it empty.
    pub fn reset(&self) -> Result<()> {
        if self.store.key_exists(&self.key)? {
            self.store.delete_key(&self.key)?;
        }
        self.store.set_bit(&self.key, self.params.bits, false)?;
        Ok(())
    }

    /// True iff all k derived bits read 1, in one non-transactional read
    /// batch. Reading a missing vector yields zeros and does not
    /// materialize it.
    pub fn contains(&self, element: &str) -> Result<bool> {
        let offsets = bit_offsets(
            element.as_bytes(),
            self.params.hash_count,
            self.params.bits,
        );
        let mut batch = Batch::new(false);
        for &offset in &offsets {
            batch.get_bit(&self.key, offset);
        }
        let replies = self.store.execute(batch)?;
        if replies.len() != offsets.len() {
            return Err(FilterError::StoreUnavailable(format!(
                "expected {} batch replies, got {}",
                offsets.len(),
                replies.len()
            )));
        }
        Ok(replies
            .iter()
            .all(|reply| matches!(reply, BatchReply::Bit(true))))
    }

    /// Sets all k derived bits in one batch, refreshing the key's expiry in
    /// the same round trip when `ttl` is given. Not transactional: partial
    /// application only ever raises the false-positive rate and the
    /// operation is idempotent.
    pub fn add(&self, element: &str, ttl: Option<Duration>) -> Result<()> {
        self.ensure_initialized()?;
        let mut batch = Batch::new(false);
        self.queue_element(&mut batch, element, true);
        if let Some(ttl) = ttl {
            batch.expire(&self.key, ttl);
        }
        self.store.execute(batch)?;
        Ok(())
    }

    /// Best-effort removal: zeroes the k derived bits. The batch is
    /// transactional so a concurrent reader sees either all bits cleared or
    /// none, bounding the blast radius of clearing bits shared with other
    /// elements.
    pub fn delete(&self, element: &str) -> Result<()> {
        let mut batch = Batch::new(true);
        self.queue_element(&mut batch, element, false);
        self.store.execute(batch)?;
        Ok(())
    }

    /// Adds a non-empty sequence of elements in one transactional batch.
    ///
    /// Every `add_count_check` calls the fill ratio is measured; a
    /// saturated filter is reset (losing prior membership) when
    /// `auto_reset` is on, and reported as
    /// [`FilterError::ExhaustedFilter`] otherwise. The check interval
    /// counts calls, not elements.
    pub fn extend<K: AsRef<str>>(
        &self,
        elements: &[K],
        ttl: Option<Duration>,
    ) -> Result<()> {
        if elements.is_empty() {
            return Err(FilterError::InvalidArgument(
                "extend requires a non-empty sequence of keys".into(),
            ));
        }

        self.ensure_initialized()?;
        let mut batch = Batch::new(true);
        for element in elements {
            self.queue_element(&mut batch, element.as_ref(), true);
        }
        if let Some(ttl) = ttl {
            batch.expire(&self.key, ttl);
        }
        self.store.execute(batch)?;

        // Unsynchronized check-then-act against concurrent adds; a spurious
        // extra reset or stale measurement only moves the false-positive
        // rate, never the correctness of a completed read.
        let count = self.add_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count > self.add_count_check {
            self.add_count.store(0, Ordering::Relaxed);
            let fill = self.fill_ratio()?;
            if fill > self.fill_max_ratio {
                if self.auto_reset {
                    self.reset()?;
                } else {
                    return Err(FilterError::ExhaustedFilter {
                        fill,
                        limit: self.fill_max_ratio,
                    });
                }
            }
        }
        Ok(())
    }

    /// Fraction of bits currently set, counted by the store.
    pub fn fill_ratio(&self) -> Result<f64> {
        let set = self.store.count_set_bits(&self.key)?;
        Ok(set as f64 / self.params.bits as f64)
    }

    pub fn is_full(&self) -> Result<bool> {
        Ok(self.fill_ratio()? > self.fill_max_ratio)
    }

    fn queue_element(&self, batch: &mut Batch, element: &str, value: bool) {
        for offset in bit_offsets(
            element.as_bytes(),
            self.params.hash_count,
            self.params.bits,
        ) {
            batch.set_bit(&self.key, offset, value);
        }
    }
}

impl<S: BitStore> std::fmt::Debug for BloomFilter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ key: {}, bits: {}, hash_count: {}, fill_max_ratio: {} }}",
            self.key,
            self.params.bits,
            self.params.hash_count,
            self.fill_max_ratio
        )
    }
}
