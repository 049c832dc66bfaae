//! Reentrant resource lock with owner tracking.
//!
//! A `ResourceLock` may be acquired any number of times by the thread that
//! holds it; the underlying mutex is released only when the recursion count
//! returns to zero. The lock has an explicit lifecycle: it must be
//! initialized before first use, and acquire/release on an uninitialized
//! lock are no-ops (the lock fails open, not closed).

use std::{
    cell::UnsafeCell,
    sync::{Condvar, Mutex, MutexGuard},
    thread::{self, ThreadId},
};

struct LockState {
    init: bool,
    owner: Option<ThreadId>,
    count: u32,
}

/// Recursive mutual-exclusion primitive with single-owner tracking.
pub struct ResourceLock {
    state: Mutex<LockState>,
    released: Condvar,
}

impl ResourceLock {
    /// Creates a lock in the uninitialized state.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(LockState { init: false, owner: None, count: 0 }),
            released: Condvar::new(),
        }
    }

    /// Creates a lock that is already initialized.
    pub fn initialized() -> Self {
        let lock = Self::new();
        lock.init();
        lock
    }

    // A poisoned state mutex only means some thread panicked while
    // updating the bookkeeping fields; the fields themselves are always
    // consistent, so recover the guard.
    fn state(&self) -> MutexGuard<'_, LockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, LockState>) -> MutexGuard<'a, LockState> {
        match self.released.wait(guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Initializes the lock. Idempotent; a second call is a no-op.
    pub fn init(&self) {
        let mut state = self.state();
        if state.init {
            return;
        }

        state.owner = None;
        state.count = 0;
        state.init = true;
    }

    /// Returns true if the lock has been initialized and not destroyed.
    pub fn is_initialized(&self) -> bool {
        self.state().init
    }

    /// Destroys the lock, returning it to the uninitialized state.
    /// No-op while the lock is held by any thread.
    pub fn destroy(&self) {
        let mut state = self.state();
        if !state.init {
            return;
        }

        if state.count != 0 {
            if cfg!(debug_assertions) {
                tracing::warn!("destroy of a resource lock that is still held; ignored");
            }

            return;
        }

        state.init = false;
    }

    /// Acquires the lock, blocking until it is available.
    ///
    /// If the calling thread already owns the lock, the recursion count is
    /// incremented without blocking. Returns false (and does nothing) when
    /// the lock is uninitialized.
    pub fn acquire(&self) -> bool {
        let me = thread::current().id();
        let mut state = self.state();
        if !state.init {
            return false;
        }

        if state.owner == Some(me) {
            state.count += 1;
            return true;
        }

        while state.owner.is_some() {
            state = self.wait(state);
        }

        // The lock may have been destroyed while we waited.
        if !state.init {
            return false;
        }

        state.owner = Some(me);
        state.count = 1;
        true
    }

    /// Releases one level of acquisition.
    ///
    /// If the calling thread is not the owner this is a no-op; unmatched
    /// releases are tolerated rather than signaled. At recursion count
    /// zero, ownership is cleared and one waiting thread is woken.
    pub fn release(&self) {
        let me = thread::current().id();
        let mut state = self.state();
        if !state.init {
            return;
        }

        if state.owner != Some(me) {
            if cfg!(debug_assertions) {
                tracing::warn!("release of a resource lock not owned by this thread; ignored");
            }

            return;
        }

        state.count -= 1;
        if state.count == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_one();
        }
    }

    /// Returns the calling thread's current recursion depth on this lock,
    /// or zero if the calling thread does not hold it.
    pub fn held_depth(&self) -> u32 {
        let state = self.state();
        if state.owner == Some(thread::current().id()) {
            state.count
        } else {
            0
        }
    }

    /// Acquires the lock and returns a guard that releases it on drop.
    /// Returns `None` when the lock is uninitialized.
    pub fn guard(&self) -> Option<LockGuard<'_>> {
        if self.acquire() {
            Some(LockGuard { lock: self })
        } else {
            None
        }
    }
}

impl Default for ResourceLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResourceLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ResourceLock")
            .field("init", &state.init)
            .field("held", &state.owner.is_some())
            .field("count", &state.count)
            .finish()
    }
}

/// Releases one level of acquisition when dropped.
#[must_use = "dropping the guard immediately releases the lock"]
pub struct LockGuard<'a> {
    lock: &'a ResourceLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// A value protected by a `ResourceLock`.
///
/// `with` runs a closure on the value while holding the lock. Because the
/// lock is reentrant, a closure that re-enters `with` on the same cell
/// would alias the exclusive borrow; the inner call is refused instead.
pub struct Guarded<T> {
    lock: ResourceLock,
    value: UnsafeCell<T>,
}

// The value is only ever reached through `with`, which holds the lock at
// recursion depth one for the whole borrow.
unsafe impl<T: Send> Sync for Guarded<T> {}

impl<T> Guarded<T> {
    /// Wraps a value behind a freshly initialized lock.
    pub fn new(value: T) -> Self {
        Self { lock: ResourceLock::initialized(), value: UnsafeCell::new(value) }
    }

    /// Returns the protecting lock.
    pub fn lock(&self) -> &ResourceLock {
        &self.lock
    }

    /// Runs `f` on the protected value while holding the lock.
    ///
    /// Returns `None` if the lock is uninitialized, or if the call is a
    /// reentrant access from within an outer `with` on this same cell.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let guard = self.lock.guard()?;
        if self.lock.held_depth() > 1 {
            return None;
        }

        let value = unsafe { &mut *self.value.get() };
        let out = f(value);
        drop(guard);
        Some(out)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Guarded<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guarded").field("lock", &self.lock).finish()
    }
}
