//! Strategy B+: mutex-guarded lazy allocation.
//!
//! The guard is held for the whole check-and-create sequence on every call,
//! including calls that find the instance already built.  That repairs the
//! race of [`NaiveLazy`](super::NaiveLazy) at the cost of lock traffic on
//! every access.

use parking_lot::Mutex;

use super::slot::HeapSlot;
use super::{AccessPoint, SlotState};
use crate::errors::Result;

/// Lazily allocated holder that locks on every access.
pub struct MutexLazy<T, F = fn() -> Result<T>> {
    guard: Mutex<()>,
    slot: HeapSlot<T>,
    init: F,
}

impl<T, F> MutexLazy<T, F> {
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
            log::debug!("[singleton] released mutex {}", std::any::type_name::<T>());
        }
        released
    }
}

impl<T, F> MutexLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    /// Return the instance, constructing it on first use.
    ///
    /// The guard is released on every exit path, including a failing
    /// initializer.
    pub fn get_instance(&self) -> Result<&T> {
        let _held = self.guard.lock();
        if let Some(existing) = self.slot.get_locked(&self.guard) {
            return Ok(existing);
        }
        let fresh = self.slot.build(&self.init)?;
        Ok(self.slot.publish(fresh).0)
    }
}

impl<T, F> AccessPoint<T> for MutexLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    fn get_instance(&self) -> Result<&T> {
        MutexLazy::get_instance(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn builds_once_and_reuses() {
        let calls = AtomicUsize::new(0);
        let holder = MutexLazy::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(String::from("guarded"))
        });
        let a = holder.get_instance().unwrap();
        let b = holder.get_instance().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(holder.state(), SlotState::Ready);
    }

    #[test]
    fn guard_released_after_failure() {
        let fail = AtomicBool::new(true);
        let holder = MutexLazy::new(|| {
            if fail.swap(false, Ordering::SeqCst) {
                Err(Error::construction::<u16>("cold start"))
            } else {
                Ok(5_u16)
            }
        });
        assert!(holder.get_instance().is_err());
        assert!(!holder.guard.is_locked());
        assert_eq!(holder.state(), SlotState::Empty);
        assert_eq!(*holder.get_instance().unwrap(), 5);
    }

    #[test]
    fn release_resets() {
        let mut holder: MutexLazy<u32> = MutexLazy::new(|| Ok(11));
        holder.get_instance().unwrap();
        assert_eq!(holder.release().map(|b| *b), Some(11));
        assert_eq!(holder.state(), SlotState::Empty);
        assert!(holder.release().is_none());
    }
}
