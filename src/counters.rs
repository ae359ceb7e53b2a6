//! Operation outcome counters.
//!
//! Every map operation reports exactly one `Outcome` once its bucket lock
//! has been released. Implementations of `Counters` only differ in how
//! they synchronize: `AtomicCounters` keeps one independent atomic per
//! category, `LockedCounters` guards all of them with a single mutex.

use crate::lock_depth::LockDepth;
use core::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;

/// Outcome category of one completed operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// Any `get`, hit or miss.
    Get,
    PutInsert,
    PutReplace,
    /// An insert aborted because the entry could not be allocated.
    PutFailed,
    DeleteHit,
    DeleteMiss,
}

/// Point-in-time copy of the counters.
///
/// With `AtomicCounters` the fields are read one by one, so the snapshot is
/// only guaranteed to satisfy the sum identity at quiescence.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OpStats {
    pub total: u64,
    pub gets: u64,
    pub put_inserts: u64,
    pub put_replaces: u64,
    pub put_failures: u64,
    pub delete_hits: u64,
    pub delete_misses: u64,
}

impl OpStats {
    /// Sum of all outcome categories; equals `total` at quiescence.
    pub fn outcome_sum(&self) -> u64 {
        self.gets
            + self.put_inserts
            + self.put_replaces
            + self.put_failures
            + self.delete_hits
            + self.delete_misses
    }

    /// Share of `count` in `total` as a percentage; 0 when nothing ran.
    pub fn percent(&self, count: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 * 100.0 / self.total as f64
    }

    fn bump(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Get => self.gets += 1,
            Outcome::PutInsert => self.put_inserts += 1,
            Outcome::PutReplace => self.put_replaces += 1,
            Outcome::PutFailed => self.put_failures += 1,
            Outcome::DeleteHit => self.delete_hits += 1,
            Outcome::DeleteMiss => self.delete_misses += 1,
        }
    }
}

/// A counter block shared by every thread using one map.
pub trait Counters: Default + Send + Sync {
    /// Short name used in log events.
    const KIND: &'static str;

    /// Count one completed operation: the total plus its category.
    fn record(&self, outcome: Outcome);

    fn snapshot(&self) -> OpStats;
}

/// Independent relaxed atomics, one per category. No shared critical section.
#[derive(Debug, Default)]
pub struct AtomicCounters {
    total: AtomicU64,
    gets: AtomicU64,
    put_inserts: AtomicU64,
    put_replaces: AtomicU64,
    put_failures: AtomicU64,
    delete_hits: AtomicU64,
    delete_misses: AtomicU64,
}

impl AtomicCounters {
    fn slot(&self, outcome: Outcome) -> &AtomicU64 {
        match outcome {
            Outcome::Get => &self.gets,
            Outcome::PutInsert => &self.put_inserts,
            Outcome::PutReplace => &self.put_replaces,
            Outcome::PutFailed => &self.put_failures,
            Outcome::DeleteHit => &self.delete_hits,
            Outcome::DeleteMiss => &self.delete_misses,
        }
    }
}

impl Counters for AtomicCounters {
    const KIND: &'static str = "atomic";

    #[inline]
    fn record(&self, outcome: Outcome) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.slot(outcome).fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OpStats {
        OpStats {
            total: self.total.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            put_inserts: self.put_inserts.load(Ordering::Relaxed),
            put_replaces: self.put_replaces.load(Ordering::Relaxed),
            put_failures: self.put_failures.load(Ordering::Relaxed),
            delete_hits: self.delete_hits.load(Ordering::Relaxed),
            delete_misses: self.delete_misses.load(Ordering::Relaxed),
        }
    }
}

/// All categories behind one mutex. Snapshots are always internally
/// consistent; every operation briefly contends on the same lock.
#[derive(Debug, Default)]
pub struct LockedCounters {
    stats: Mutex<OpStats>,
}

impl Counters for LockedCounters {
    const KIND: &'static str = "locked";

    #[inline]
    fn record(&self, outcome: Outcome) {
        let _depth = LockDepth::enter();
        self.stats.lock().bump(outcome);
    }

    fn snapshot(&self) -> OpStats {
        let _depth = LockDepth::enter();
        *self.stats.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const ALL: [Outcome; 6] = [
        Outcome::Get,
        Outcome::PutInsert,
        Outcome::PutReplace,
        Outcome::PutFailed,
        Outcome::DeleteHit,
        Outcome::DeleteMiss,
    ];

    fn record_each<C: Counters>(c: &C) {
        for (i, o) in ALL.iter().enumerate() {
            for _ in 0..=i {
                c.record(*o);
            }
        }
    }

    fn expected() -> OpStats {
        OpStats {
            total: 21,
            gets: 1,
            put_inserts: 2,
            put_replaces: 3,
            put_failures: 4,
            delete_hits: 5,
            delete_misses: 6,
        }
    }

    /// Invariant: every record bumps the total and exactly one category.
    #[test]
    fn atomic_records_per_category() {
        let c = AtomicCounters::default();
        record_each(&c);
        let s = c.snapshot();
        assert_eq!(s, expected());
        assert_eq!(s.outcome_sum(), s.total);
    }

    #[test]
    fn locked_records_per_category() {
        let c = LockedCounters::default();
        record_each(&c);
        let s = c.snapshot();
        assert_eq!(s, expected());
        assert_eq!(s.outcome_sum(), s.total);
    }

    /// Invariant: percentages never divide by zero.
    #[test]
    fn percent_of_empty_is_zero() {
        let s = OpStats::default();
        assert_eq!(s.percent(0), 0.0);
        assert_eq!(s.percent(5), 0.0);
    }

    #[test]
    fn percent_of_total() {
        let s = OpStats {
            total: 4,
            gets: 1,
            ..OpStats::default()
        };
        assert_eq!(s.percent(s.gets), 25.0);
        assert_eq!(s.percent(4), 100.0);
    }

    /// Invariant: concurrent recording loses no increments in either flavor.
    #[test]
    fn concurrent_records_are_not_lost() {
        fn hammer<C: Counters>() -> OpStats {
            let c = C::default();
            thread::scope(|s| {
                for t in 0..4 {
                    let c = &c;
                    s.spawn(move || {
                        for i in 0..1000 {
                            c.record(ALL[(t + i) % ALL.len()]);
                        }
                    });
                }
            });
            c.snapshot()
        }

        for s in [hammer::<AtomicCounters>(), hammer::<LockedCounters>()] {
            assert_eq!(s.total, 4000);
            assert_eq!(s.outcome_sum(), 4000);
        }
    }
}
