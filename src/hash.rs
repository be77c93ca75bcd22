//! Bucket hashing: maps a key and a bucket count to a bucket index.
//!
//! The default [`Polynomial37`] hasher accumulates `value * 37 + byte` over
//! the key bytes. It is unseeded, so an adversary who can choose keys can
//! pile them into one chain. Callers exposed to untrusted keys should plug
//! in their own [`BucketHasher`].

use core::num::NonZeroUsize;

/// Chooses the bucket a key lives in.
///
/// Implementations must be deterministic: the same key and bucket count
/// always yield the same index, and the index should be `< bucket_count`.
/// The table reduces any larger index modulo `bucket_count`, so an
/// out-of-range answer skews placement but never panics.
pub trait BucketHasher {
    fn bucket_index(&self, key: &[u8], bucket_count: NonZeroUsize) -> usize;
}

/// Multiplicative polynomial hash with base 37.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Polynomial37;

const BASE: u128 = 37;

impl BucketHasher for Polynomial37 {
    #[inline]
    fn bucket_index(&self, key: &[u8], bucket_count: NonZeroUsize) -> usize {
        bucket_index(key, bucket_count)
    }
}

/// Index of `key` among `bucket_count` buckets.
///
/// Equal to the unbounded polynomial `sum(byte_i * 37^(len-1-i))` taken
/// modulo `bucket_count`. Reducing after every step keeps the accumulator
/// below `bucket_count`, so `acc * 37 + 255` always fits in 128 bits and
/// the result never depends on intermediate wrap-around.
pub fn bucket_index(key: &[u8], bucket_count: NonZeroUsize) -> usize {
    let n = bucket_count.get() as u128;
    let acc = key
        .iter()
        .fold(0u128, |acc, &b| (acc * BASE + b as u128) % n);
    acc as usize
}
