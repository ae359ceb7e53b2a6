//! ts-hashmap: a fixed-capacity hash map for integer keys that any number
//! of threads can read and write at once.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep operations on different keys parallel while operations on
//!   the same bucket stay mutually exclusive and linearizable, and keep
//!   exact outcome counts without a map-wide lock.
//! - Layers:
//!   - Chain<K, V>: one bucket's entries as a singly linked list whose
//!     nodes live in a `Vec` arena and link by slot index, with freed
//!     slots kept on a free list. Inserts append at the tail; lookups
//!     scan from the head.
//!   - ConcurrentMap<K, V, C>: a boxed slice of buckets fixed at
//!     construction, each a `parking_lot::Mutex<Chain>`, plus an atomic
//!     live-entry count and a counter block `C: Counters`.
//!   - Counters: `AtomicCounters` (default, one atomic per outcome) or
//!     `LockedCounters` (one mutex over all outcomes).
//!
//! Constraints
//! - Capacity never changes; there is no rehashing.
//! - Keys are fixed-width signed integers (`RouteKey`), routed by
//!   reinterpreting them as unsigned and taking the remainder by capacity.
//! - Absent keys are reported as `None`, never as an in-band value.
//!
//! Locking discipline
//! - An operation takes exactly one bucket lock, releases it, and only
//!   then records its outcome. No thread ever holds two map locks, so no
//!   lock-order cycle exists. Debug builds assert this per thread (see
//!   `lock_depth`).
//! - The live-entry count is updated while the bucket lock is held but is
//!   its own synchronization domain; `len()` and `stats()` only agree with
//!   the chains at quiescence.
//!
//! Lifecycle
//! - Construction reserves the bucket array fallibly and fails with
//!   `MapError` on zero capacity or allocation failure. Empty chains own
//!   no heap memory, so that is the only allocation construction makes.
//! - A chain grows its arena with `try_reserve`; an insert that cannot
//!   get memory fails with `MapError::EntryAllocation` and changes nothing.
//! - `teardown` consumes the map and returns a `Report`; ownership makes
//!   double teardown and use after teardown compile errors.
//!
//! Notes and non-goals
//! - No iteration order across the map; `dump()` copies buckets one at a
//!   time and is not an atomic snapshot.
//! - No multi-key transactions and no persistence.

mod chain;
mod chain_proptest;
pub mod config;
pub mod counters;
mod error;
mod lock_depth;
mod map;
pub mod report;
mod route;

// Public surface
pub use chain::PutOutcome;
pub use config::{MapConfig, DEFAULT_CAPACITY};
pub use counters::{AtomicCounters, Counters, LockedCounters, OpStats, Outcome};
pub use error::MapError;
pub use map::ConcurrentMap;
pub use report::{Dump, Report};
pub use route::RouteKey;
