//! Sliding-window Bloom filter membership over an external bit-addressable
//! key-value store.
//!
//! Answers "have we seen this element recently?" for deduplication,
//! idempotency checks and rate limiting, without holding the bit vectors in
//! process memory.
//!
//! HowTo:
//!    * Buckets: time is sliced into fixed-duration buckets, one Bloom
//!      filter (one stored bit vector) per bucket.
//!    * Keys: a bucket's store key is the series base key plus the bucket's
//!      resolution-truncated start timestamp, so any two instants inside
//!      the same slice address the same vector.
//!    * Rotation: queries over "the last W" aggregate ceil(W/resolution)
//!      buckets, most recent first; each bucket expires on its own through
//!      the TTL refreshed at add time.
//!
//! Insertion:
//!     * An element added at time t lands in the bucket(s) covering t; its
//!      k bit offsets come from two fixed 32-bit hashes combined with
//!      Kirsch-Mitzenmacher double hashing.
//! Query:
//!     * Membership over a window checks each covered bucket and
//!       short-circuits on the first hit.
//! Expiration:
//!     * Buckets older than the retention limit fall out of the default
//!       query window and are dropped by the store once their TTL passes,
//!       so no cleanup thread runs in this crate.
//!
//! Obvious problems:
//!     * False positives: inherent to Bloom filters, and elements present
//!       in several buckets raise the aggregate rate.
//!     * Deletion is best-effort only: clearing bits can erase other
//!       hash-colliding elements.
//!     * 32-bit base hashes cap the useful vector size around 2**32 bits.

#[cfg(feature = "server")]
pub mod api;
pub mod common;
mod config;
mod error;
mod filter;
mod hash;
mod inmemory_storage;
mod series;
mod storage;
#[cfg(feature = "server")]
pub mod types;

pub use config::{
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError, FilterParams,
};
pub use error::{FilterError, Result};
pub use filter::BloomFilter;
pub use hash::{bit_offsets, optimal_bit_count, optimal_hash_count};
pub use inmemory_storage::InMemoryStorage;
pub use series::RotatingBloomSeries;
pub use storage::{Batch, BatchCommand, BatchReply, BitStore};
#[cfg(feature = "server")]
pub use types::{
    AppState, ServerConfig, ServerConfigBuilder, ServerConfigBuilderError,
};
