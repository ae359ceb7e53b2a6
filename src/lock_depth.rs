//! Debug-only lock depth tracker.
//!
//! Map operations never hold two of the map's locks at once: the bucket
//! lock is released before the counter block is touched, and the dump
//! visits buckets one at a time. That is what rules out lock-order cycles.
//! In debug builds every lock acquisition site enters a per-thread guard
//! first, and entering while a guard is live panics. In release builds the
//! guard compiles to nothing.

use core::marker::PhantomData;

#[cfg(debug_assertions)]
use core::cell::Cell;

#[cfg(debug_assertions)]
thread_local! {
    static DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Per-thread tracker of map locks currently held. Guard lock sites with
/// `let _depth = LockDepth::enter();` before taking the lock, so the lock
/// guard is dropped first.
#[derive(Debug)]
pub(crate) struct LockDepth;

impl LockDepth {
    /// Enter a lock site. In debug builds, panics if this thread already
    /// holds a map lock.
    #[inline]
    pub(crate) fn enter() -> LockDepthGuard {
        #[cfg(debug_assertions)]
        DEPTH.with(|d| {
            let held = d.get();
            assert!(held == 0, "lock discipline violated: second map lock taken while holding one");
            d.set(held + 1);
        });
        LockDepthGuard { _nosend: PhantomData }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn held() -> u32 {
        DEPTH.with(|d| d.get())
    }
}

/// RAII guard returned by `LockDepth::enter`. Tied to the entering thread.
pub(crate) struct LockDepthGuard {
    _nosend: PhantomData<*mut ()>,
}

impl Drop for LockDepthGuard {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        DEPTH.with(|d| {
            let held = d.get();
            debug_assert!(held > 0);
            d.set(held - 1);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::LockDepth;

    #[test]
    fn enter_and_exit_is_ok() {
        let _g = LockDepth::enter();
        drop(_g);
        let _again = LockDepth::enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_enter_panics_in_debug() {
        let res = std::panic::catch_unwind(|| {
            let _g1 = LockDepth::enter();
            let _g2 = LockDepth::enter();
        });
        assert!(res.is_err(), "expected nested lock entry to panic in debug builds");
        // The outer guard unwound, so the thread is clean again.
        assert_eq!(LockDepth::held(), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn depth_is_per_thread() {
        let _g = LockDepth::enter();
        std::thread::spawn(|| {
            assert_eq!(LockDepth::held(), 0);
            let _other = LockDepth::enter();
        })
        .join()
        .unwrap();
        assert_eq!(LockDepth::held(), 1);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_enter_noop_in_release() {
        let _g1 = LockDepth::enter();
        let _g2 = LockDepth::enter();
        let (_g1, _g2) = (_g1, _g2);
    }
}
