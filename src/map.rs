//! ConcurrentMap: fixed bucket array, one lock per bucket, outcome counters.

use crate::chain::{Chain, PutOutcome};
use crate::config::MapConfig;
use crate::counters::{AtomicCounters, Counters, OpStats, Outcome};
use crate::error::MapError;
use crate::lock_depth::LockDepth;
use crate::report::{Dump, Report};
use crate::route::{bucket_index, RouteKey};
use core::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;

/// One routing slot. The chain is only reachable through the lock.
#[derive(Debug)]
struct Bucket<K, V> {
    chain: Mutex<Chain<K, V>>,
}

/// A fixed-capacity hash map safe to share between threads.
///
/// Operations on keys in different buckets run in parallel; operations on
/// the same bucket serialize on that bucket's lock. Each operation holds at
/// most one lock at a time and records its outcome in the counter block
/// after the bucket lock is released.
#[derive(Debug)]
pub struct ConcurrentMap<K = i32, V = i32, C = AtomicCounters> {
    buckets: Box<[Bucket<K, V>]>,
    size: AtomicUsize,
    counters: C,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: RouteKey,
    V: Copy,
{
    /// Build a map with `capacity` buckets and the default atomic counters.
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::with_config(MapConfig::new(capacity))
    }
}

impl<K, V, C> ConcurrentMap<K, V, C>
where
    K: RouteKey,
    V: Copy,
    C: Counters,
{
    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        let capacity = match config.validate() {
            Ok(c) => c.get(),
            Err(e) => {
                tracing::warn!(capacity = config.capacity, error = %e, "rejected map config");
                return Err(e);
            }
        };

        let mut buckets = Vec::new();
        if let Err(source) = buckets.try_reserve_exact(capacity) {
            tracing::warn!(capacity, error = %source, "bucket allocation failed");
            return Err(MapError::BucketAllocation { capacity, source });
        }
        buckets.extend((0..capacity).map(|_| Bucket {
            chain: Mutex::new(Chain::new()),
        }));

        tracing::debug!(capacity, counters = C::KIND, "created map");
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            size: AtomicUsize::new(0),
            counters: C::default(),
        })
    }

    /// Number of buckets; fixed for the map's lifetime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Live entries. Exact at quiescence; may lag concurrent mutators.
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket index `key` routes to.
    pub fn route(&self, key: K) -> usize {
        bucket_index(key, self.capacity())
    }

    /// Snapshot of the counter block.
    pub fn stats(&self) -> OpStats {
        self.counters.snapshot()
    }

    fn bucket(&self, key: K) -> (usize, &Bucket<K, V>) {
        let index = self.route(key);
        (index, &self.buckets[index])
    }

    pub fn get(&self, key: K) -> Option<V> {
        let (index, bucket) = self.bucket(key);
        let found = {
            let _depth = LockDepth::enter();
            let chain = bucket.chain.lock();
            chain.get(&key)
        };
        tracing::trace!(?key, bucket = index, hit = found.is_some(), "get");
        self.counters.record(Outcome::Get);
        found
    }

    /// Insert `key` or overwrite its value.
    ///
    /// Returns `PutOutcome::Replaced` with the previous value when the key
    /// was present. If a new entry cannot be allocated the bucket is left
    /// unchanged and `MapError::EntryAllocation` is returned; the attempt
    /// still counts toward the operation total.
    pub fn put(&self, key: K, value: V) -> Result<PutOutcome<V>, MapError> {
        let (index, bucket) = self.bucket(key);
        let result = {
            let _depth = LockDepth::enter();
            let mut chain = bucket.chain.lock();
            let result = chain.put(key, value);
            if let Ok(PutOutcome::Inserted) = result {
                self.size.fetch_add(1, Ordering::AcqRel);
            }
            result.map(|outcome| (outcome, chain.len()))
        };

        match result {
            Ok((outcome, chain_len)) => {
                let recorded = match outcome {
                    PutOutcome::Inserted => Outcome::PutInsert,
                    PutOutcome::Replaced(_) => Outcome::PutReplace,
                };
                tracing::trace!(?key, bucket = index, chain_len, outcome = ?recorded, "put");
                self.counters.record(recorded);
                Ok(outcome)
            }
            Err(source) => {
                tracing::warn!(?key, bucket = index, error = %source, "entry allocation failed");
                self.counters.record(Outcome::PutFailed);
                Err(MapError::EntryAllocation(source))
            }
        }
    }

    /// Remove `key`, returning the value it held.
    pub fn delete(&self, key: K) -> Option<V> {
        let (index, bucket) = self.bucket(key);
        let removed = {
            let _depth = LockDepth::enter();
            let mut chain = bucket.chain.lock();
            let removed = chain.remove(&key);
            if removed.is_some() {
                self.size.fetch_sub(1, Ordering::AcqRel);
            }
            removed
        };
        tracing::trace!(?key, bucket = index, hit = removed.is_some(), "delete");
        self.counters.record(if removed.is_some() {
            Outcome::DeleteHit
        } else {
            Outcome::DeleteMiss
        });
        removed
    }

    /// Copy every non-empty bucket, locking one bucket at a time.
    pub fn dump(&self) -> Dump<K, V> {
        let mut dump = Dump::default();
        for (index, bucket) in self.buckets.iter().enumerate() {
            let entries: Vec<(K, V)> = {
                let _depth = LockDepth::enter();
                let chain = bucket.chain.lock();
                if chain.is_empty() {
                    continue;
                }
                chain.iter().map(|(k, v)| (*k, *v)).collect()
            };
            dump.push(index, entries);
        }
        dump
    }

    /// Consume the map, releasing every entry, and return the final report.
    ///
    /// Taking `self` by value means no operation can be in flight and the
    /// map cannot be used or torn down again afterwards.
    pub fn teardown(self) -> Report {
        let report = Report {
            stats: self.counters.snapshot(),
            size: self.size.load(Ordering::Acquire),
        };
        let s = &report.stats;
        tracing::info!(
            total_ops = s.total,
            gets = s.gets,
            put_inserts = s.put_inserts,
            put_replaces = s.put_replaces,
            put_failures = s.put_failures,
            delete_hits = s.delete_hits,
            delete_misses = s.delete_misses,
            size = report.size,
            "map torn down"
        );
        report
    }
}
