//! Strategy B++: double-checked locking.
//!
//! The fast path is a single `Acquire` load of the instance pointer.  Only
//! when it is null does a caller take the guard, check again, and build.
//! Publication is a `Release` store made after the instance is fully
//! constructed, so any thread whose `Acquire` load sees the pointer also
//! sees every write the initializer made.
//!
//! Dropping either ordering to `Relaxed` reintroduces the classic DCL bug:
//! a reader could observe the pointer before the fields it points to.

use parking_lot::Mutex;

use super::slot::HeapSlot;
use super::{AccessPoint, SlotState};
use crate::errors::Result;

/// Lazily allocated holder that only locks while the instance is missing.
///
/// ```
/// use dp_core::patterns::singleton::DoubleCheckedLazy;
///
/// static POOL: DoubleCheckedLazy<Vec<u8>> = DoubleCheckedLazy::new(|| Ok(vec![0; 16]));
///
/// let pool = POOL.get_instance().unwrap();
/// assert_eq!(pool.len(), 16);
/// assert!(std::ptr::eq(pool, POOL.get_instance().unwrap()));
/// ```
pub struct DoubleCheckedLazy<T, F = fn() -> Result<T>> {
    guard: Mutex<()>,
    slot: HeapSlot<T>,
    init: F,
}

impl<T, F> DoubleCheckedLazy<T, F> {
    /// Create an empty holder that will build its instance with `init`.
    pub const fn new(init: F) -> Self {
        Self {
            guard: parking_lot::const_mutex(()),
            slot: HeapSlot::new(),
            init,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    /// Detach the instance, leaving the holder empty.
    pub fn release(&mut self) -> Option<Box<T>> {
        let released = self.slot.take();
        if released.is_some() {
            log::debug!(
                "[singleton] released double-checked {}",
                std::any::type_name::<T>()
            );
        }
        released
    }
}

impl<T, F> DoubleCheckedLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    /// Return the instance, constructing it on first use.
    pub fn get_instance(&self) -> Result<&T> {
        // First check: no lock, acquire load.
        if let Some(existing) = self.slot.get() {
            return Ok(existing);
        }
        let _held = self.guard.lock();
        // Second check: someone may have published while we waited.
        if let Some(existing) = self.slot.get_locked(&self.guard) {
            return Ok(existing);
        }
        let fresh = self.slot.build(&self.init)?;
        // Release store.
        Ok(self.slot.publish(fresh).0)
    }
}

impl<T, F> AccessPoint<T> for DoubleCheckedLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    fn get_instance(&self) -> Result<&T> {
        DoubleCheckedLazy::get_instance(self)
    }
}
