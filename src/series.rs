use crate::config::{FilterConfig, FilterParams};
use crate::error::{FilterError, Result};
use crate::filter::BloomFilter;
use crate::storage::BitStore;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A time-keyed family of [`BloomFilter`] buckets, one per
/// resolution-wide slice.
///
/// A bucket's identity key is the base key plus the bucket's start
/// timestamp truncated to the resolution, so any two instants inside the
/// same slice address the same stored vector. The series never deletes
/// buckets itself; each one expires through the TTL set at add time
/// (retention limit plus one second), decoupling cleanup from any process
/// lifetime.
///
/// All operations take `now` explicitly. Callers wanting wall-clock
/// behavior pass `SystemTime::now()`.
pub struct RotatingBloomSeries<S: BitStore> {
    store: Arc<S>,
    base_key: String,
    config: FilterConfig,
    params: FilterParams,
}

impl<S: BitStore> RotatingBloomSeries<S> {
    pub fn new(
        store: Arc<S>,
        base_key: impl Into<String>,
        config: FilterConfig,
    ) -> Result<Self> {
        let params = config.params()?;
        Ok(Self {
            store,
            base_key: base_key.into(),
            config,
            params,
        })
    }

    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// The bucket filters covering the last `within`, most recent first.
    ///
    /// ceil(within/resolution) buckets are yielded, keyed at the
    /// resolution-truncated `now` and stepping one resolution back each.
    /// Filters are constructed lazily with the series' parameters; buckets
    /// that would precede the Unix epoch are not yielded.
    pub fn buckets_for(
        &self,
        within: Duration,
        now: SystemTime,
    ) -> Result<Vec<BloomFilter<S>>> {
        let resolution = self.config.resolution.as_micros();
        let num_buckets = within.as_micros().div_ceil(resolution);

        let now_micros = now
            .duration_since(UNIX_EPOCH)
            .map_err(|_| {
                FilterError::InvalidArgument(
                    "timestamp precedes the Unix epoch".into(),
                )
            })?
            .as_micros();
        let current_start = now_micros - now_micros % resolution;

        let mut buckets = Vec::with_capacity(num_buckets as usize);
        for x in 0..num_buckets {
            let Some(start) = current_start.checked_sub(x * resolution) else {
                break;
            };
            buckets.push(BloomFilter::from_parts(
                Arc::clone(&self.store),
                self.bucket_key(start),
                self.params,
                &self.config,
            ));
        }
        Ok(buckets)
    }

    /// Records `element` in the bucket(s) of the last `resolution`.
    pub fn add(&self, element: &str, now: SystemTime) -> Result<()> {
        self.add_within(element, self.config.resolution, now)
    }

    /// Records `element` in every bucket of the last `within`, refreshing
    /// each bucket's expiry to the retention limit plus one second.
    pub fn add_within(
        &self,
        element: &str,
        within: Duration,
        now: SystemTime,
    ) -> Result<()> {
        let ttl = self.config.retention_limit + Duration::from_secs(1);
        for bucket in self.buckets_for(within, now)? {
            bucket.add(element, Some(ttl))?;
        }
        Ok(())
    }

    /// Was `element` seen within the retention limit?
    pub fn contains(&self, element: &str, now: SystemTime) -> Result<bool> {
        self.contains_within(element, self.config.retention_limit, now)
    }

    /// Was `element` seen within the last `within`? Short-circuits on the
    /// first (most recent) bucket that reports membership.
    pub fn contains_within(
        &self,
        element: &str,
        within: Duration,
        now: SystemTime,
    ) -> Result<bool> {
        for bucket in self.buckets_for(within, now)? {
            if bucket.contains(element)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Best-effort removal of `element` across the retention limit.
    pub fn delete(&self, element: &str, now: SystemTime) -> Result<()> {
        self.delete_within(element, self.config.retention_limit, now)
    }

    /// Best-effort removal of `element` from every bucket of the last
    /// `within`. Only buckets already reporting membership are touched, so
    /// the delete never materializes an empty bucket.
    pub fn delete_within(
        &self,
        element: &str,
        within: Duration,
        now: SystemTime,
    ) -> Result<()> {
        for bucket in self.buckets_for(within, now)? {
            if bucket.contains(element)? {
                bucket.delete(element)?;
            }
        }
        Ok(())
    }

    fn bucket_key(&self, bucket_start_micros: u128) -> String {
        format!("{}|{}", self.base_key, bucket_start_micros)
    }
}

impl<S: BitStore> std::fmt::Debug for RotatingBloomSeries<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RotatingBloomSeries {{ base_key: {}, bits: {}, hash_count: {}, resolution: {:?}, retention_limit: {:?} }}",
            self.base_key,
            self.params.bits,
            self.params.hash_count,
            self.config.resolution,
            self.config.retention_limit
        )
    }
}
