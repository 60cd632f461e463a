//! Debug-only reentrancy guard.
//!
//! The table calls into user code (bucket, compare, map and discard
//! functions) while a bucket may be mid-update. Mutating entry points hold
//! a guard so that a callback reaching back into a mutating entry point of
//! the same table panics in debug builds. Read-only lookups take no guard.
//! Release builds compile the guard away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-container nesting tracker. Guard entry points with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    #[cfg(debug_assertions)]
    owner: &'static str,
    // Single-threaded containers: !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    /// `owner` names the container in the panic message.
    #[allow(unused_variables)]
    pub const fn new(owner: &'static str) -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            #[cfg(debug_assertions)]
            owner,
            _nosend: PhantomData,
        }
    }

    /// Enter a guarded section. Panics in debug builds if one is already
    /// open on this tracker.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(
                d == 0,
                "reentrancy detected: callback re-entered the {} it was called from",
                self.owner
            );
            self.depth.set(d + 1);
            ReentrancyGuard { tracker: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _z: PhantomData }
        }
    }

    /// Whether a guarded section is currently open. Always false in
    /// release builds.
    #[cfg(test)]
    #[inline]
    pub fn is_entered(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            self.depth.get() > 0
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    tracker: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.tracker.depth.get();
            debug_assert!(d > 0);
            self.tracker.depth.set(d - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new("table");
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let r = DebugReentrancy::new("table");
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter();
            assert!(r.is_entered());
            let _g2 = r.enter();
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_released_on_drop() {
        let r = DebugReentrancy::new("table");
        let g = r.enter();
        assert!(r.is_entered());
        drop(g);
        assert!(!r.is_entered());
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let r = DebugReentrancy::new("table");
        let _g1 = r.enter();
        let _g2 = r.enter();
        assert!(!r.is_entered());
    }
}
