//! Re-entry protection for the per-entity capture redraw.
//!
//! Redrawing an entity into the capture buffer goes through the host's
//! *generic* entity-draw routine -- the same routine the outer frame loop is
//! already iterating, which calls back into the highlight pre-draw hook.
//! Without a guard that nested call would match the same entity again and
//! recurse without bound. [`RecursionGuard`] is the frame-local flag that
//! breaks the cycle: the nested invocation sees the flag set and returns
//! immediately with zero side effects.
//!
//! Rendering is single-threaded and frame-synchronous, so the flag is a
//! plain [`Cell`] and the guard is deliberately `!Sync`. Set/clear pairs
//! are strictly nested: [`try_enter`](RecursionGuard::try_enter) hands out
//! a [`ReentryToken`] that clears the flag on drop, so the flag returns to
//! false even when the redraw bails out early.

use std::cell::Cell;

/// Frame-local flag preventing the capture redraw from re-entering itself.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    active: Cell<bool>,
}

impl RecursionGuard {
    /// A fresh guard with the flag clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a capture redraw is in flight.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Set the flag and return a token that clears it on drop, or `None` if
    /// a redraw is already in flight. A `None` return is the designed
    /// safety valve, not an error: the caller skips the nested redraw.
    pub fn try_enter(&self) -> Option<ReentryToken<'_>> {
        if self.active.get() {
            return None;
        }
        self.active.set(true);
        Some(ReentryToken { guard: self })
    }
}

/// Scoped hold on a [`RecursionGuard`]; clears the flag when dropped.
#[derive(Debug)]
pub struct ReentryToken<'a> {
    guard: &'a RecursionGuard,
}

impl Drop for ReentryToken<'_> {
    fn drop(&mut self) {
        self.guard.active.set(false);
    }
}
