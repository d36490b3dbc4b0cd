//! Heap slot shared by the naive, mutex and double-checked holders.
//!
//! The slot owns at most one `Box<T>` through an `AtomicPtr<T>`.  Published
//! pointers are only freed by [`HeapSlot::take`] and `Drop`, which both need
//! `&mut self`; every `&T` handed out borrows `&self`, so it cannot dangle.
//!
//! This is the only module in the crate allowed to use `unsafe`.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;

use super::SlotState;
use crate::errors::Result;

pub(crate) struct HeapSlot<T> {
    ptr: AtomicPtr<T>,
    /// Number of initializers currently running.
    building: AtomicUsize,
    _owns: PhantomData<*mut T>,
}

// SAFETY: the slot owns a `Box<T>`; moving the slot moves the box.
unsafe impl<T: Send> Send for HeapSlot<T> {}
// SAFETY: shared access hands out `&T` to many threads and may construct `T`
// on one thread and drop it on another, same bounds as `OnceLock<T>`.
unsafe impl<T: Send + Sync> Sync for HeapSlot<T> {}

impl<T> HeapSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
            building: AtomicUsize::new(0),
            _owns: PhantomData,
        }
    }

    /// Unguarded read.  The `Acquire` load pairs with the `Release` in
    /// [`publish`](Self::publish), so a non-null pointer always refers to a
    /// fully constructed value.
    pub(crate) fn get(&self) -> Option<&T> {
        let p = self.ptr.load(Ordering::Acquire);
        // SAFETY: non-null pointers come from `Box::into_raw` and stay valid
        // until `take`/`Drop`, which need `&mut self`.
        unsafe { p.as_ref() }
    }

    /// Read while the caller holds `guard`.  Every publication happens under
    /// the same guard, so the lock already orders the pointee and a `Relaxed`
    /// load is enough.
    ///
    /// `guard` must be the mutex that serializes every `publish` on this slot
    /// and the caller must hold it; debug builds check the latter.
    pub(crate) fn get_locked(&self, guard: &Mutex<()>) -> Option<&T> {
        debug_assert!(guard.is_locked(), "get_locked called without the guard");
        let p = self.ptr.load(Ordering::Relaxed);
        // SAFETY: as in `get`; visibility of the pointee comes from the lock.
        unsafe { p.as_ref() }
    }

    /// Run `init` and box the result, tracking the `Constructing` state.
    pub(crate) fn build(&self, init: impl FnOnce() -> Result<T>) -> Result<Box<T>> {
        let _ticket = Building::enter(&self.building);
        log::debug!("[singleton] constructing {}", std::any::type_name::<T>());
        match init() {
            Ok(value) => Ok(Box::new(value)),
            Err(err) => {
                log::debug!("[singleton] construction failed: {err}");
                Err(err)
            }
        }
    }

    /// Become the only initializer of an empty slot.
    ///
    /// Succeeds only when no other construction is running.  The returned
    /// ticket keeps the slot in `Constructing` until it is dropped, so the
    /// claimant must publish before letting it go.
    pub(crate) fn claim(&self) -> Option<Building<'_>> {
        Building::claim(&self.building)
    }

    /// Block until the slot is published or nobody is constructing it.
    pub(crate) fn wait_while_constructing(&self) {
        let mut spins = 0_u32;
        while self.ptr.load(Ordering::Acquire).is_null()
            && self.building.load(Ordering::Acquire) > 0
        {
            if spins < 64 {
                spins += 1;
                std::hint::spin_loop();
            } else {
                thread::yield_now();
            }
        }
    }

    /// Unconditionally store `value`.
    ///
    /// If another instance was already published it is **leaked**: it is
    /// never freed, so references to it stay valid.  Returns the new
    /// instance and whether something was overwritten.
    pub(crate) fn publish(&self, value: Box<T>) -> (&T, bool) {
        let raw = Box::into_raw(value);
        let previous = self.ptr.swap(raw, Ordering::AcqRel);
        let overwrote = !previous.is_null();
        if overwrote {
            log::warn!(
                "[singleton] {} published twice; leaking the earlier instance",
                std::any::type_name::<T>()
            );
        } else {
            log::debug!("[singleton] published {}", std::any::type_name::<T>());
        }
        // SAFETY: `raw` was just produced by `Box::into_raw` and is now owned
        // by the slot.
        (unsafe { &*raw }, overwrote)
    }

    /// Store `value` only if the slot is still empty.
    ///
    /// The loser of the race drops its own allocation and adopts the
    /// published instance.  Returns the published instance and whether
    /// `value` won.
    pub(crate) fn publish_if_empty(&self, value: Box<T>) -> (&T, bool) {
        let raw = Box::into_raw(value);
        match self
            .ptr
            .compare_exchange(ptr::null_mut(), raw, Ordering::Release, Ordering::Acquire)
        {
            Ok(_) => {
                log::debug!("[singleton] published {}", std::any::type_name::<T>());
                // SAFETY: `raw` is now owned by the slot.
                (unsafe { &*raw }, true)
            }
            Err(winner) => {
                log::debug!(
                    "[singleton] lost publication race for {}; dropping duplicate",
                    std::any::type_name::<T>()
                );
                // SAFETY: `raw` came from `Box::into_raw` above and was never
                // shared with another thread.
                drop(unsafe { Box::from_raw(raw) });
                // SAFETY: `winner` is non-null (the exchange failed) and owned
                // by the slot.
                (unsafe { &*winner }, false)
            }
        }
    }

    /// Detach the published instance, leaving the slot empty.
    pub(crate) fn take(&mut self) -> Option<Box<T>> {
        let p = std::mem::replace(self.ptr.get_mut(), ptr::null_mut());
        if p.is_null() {
            None
        } else {
            // SAFETY: exclusive access; `p` came from `Box::into_raw`.
            Some(unsafe { Box::from_raw(p) })
        }
    }

    pub(crate) fn state(&self) -> SlotState {
        if !self.ptr.load(Ordering::Acquire).is_null() {
            SlotState::Ready
        } else if self.building.load(Ordering::Acquire) > 0 {
            SlotState::Constructing
        } else {
            SlotState::Empty
        }
    }
}

impl<T> Drop for HeapSlot<T> {
    fn drop(&mut self) {
        drop(self.take());
    }
}

/// Keeps `building` incremented while an initializer runs, including when
/// it returns an error or panics.
#[must_use]
pub(crate) struct Building<'a>(&'a AtomicUsize);

impl<'a> Building<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }

    fn claim(counter: &'a AtomicUsize) -> Option<Self> {
        counter
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(counter))
    }
}

impl Drop for Building<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn empty_slot() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        assert!(slot.get().is_none());
        assert_eq!(slot.state(), SlotState::Empty);
    }

    #[test]
    fn publish_then_take() {
        let mut slot = HeapSlot::new();
        let value = slot.build(|| Ok(7_u32)).unwrap();
        let (published, overwrote) = slot.publish(value);
        assert_eq!(*published, 7);
        assert!(!overwrote);
        assert_eq!(slot.state(), SlotState::Ready);
        assert_eq!(slot.take().map(|b| *b), Some(7));
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.take().is_none());
    }

    #[test]
    fn publish_reports_overwrite() {
        let slot = HeapSlot::new();
        slot.publish(Box::new(1_u32));
        let (second, overwrote) = slot.publish(Box::new(2_u32));
        assert!(overwrote);
        assert_eq!(*second, 2);
        assert_eq!(slot.get().copied(), Some(2));
    }

    #[test]
    fn publish_if_empty_keeps_winner() {
        let slot = HeapSlot::new();
        let (first, won) = slot.publish_if_empty(Box::new(1_u32));
        assert!(won);
        assert_eq!(*first, 1);
        let (again, won) = slot.publish_if_empty(Box::new(2_u32));
        assert!(!won);
        assert_eq!(*again, 1);
    }

    #[test]
    fn constructing_state_visible_during_build() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let mut observed = None;
        let _ = slot.build(|| {
            observed = Some(slot.state());
            Ok(0)
        });
        assert_eq!(observed, Some(SlotState::Constructing));
        assert_eq!(slot.state(), SlotState::Empty);
    }

    #[test]
    fn claim_is_exclusive_until_dropped() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let first = slot.claim().unwrap();
        assert!(slot.claim().is_none());
        assert_eq!(slot.state(), SlotState::Constructing);
        drop(first);
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.claim().is_some());
    }

    #[test]
    fn claim_fails_while_another_build_runs() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let mut claimed = None;
        let _ = slot.build(|| {
            claimed = Some(slot.claim().is_some());
            Ok(0)
        });
        assert_eq!(claimed, Some(false));
    }

    #[test]
    fn waiter_wakes_on_publish() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let claim = slot.claim().unwrap();
        std::thread::scope(|scope| {
            let waiter = scope.spawn(|| {
                slot.wait_while_constructing();
                slot.get().copied()
            });
            slot.publish_if_empty(Box::new(9));
            drop(claim);
            assert_eq!(waiter.join().unwrap(), Some(9));
        });
    }

    #[test]
    fn waiter_wakes_when_the_claim_is_abandoned() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let claim = slot.claim().unwrap();
        std::thread::scope(|scope| {
            let waiter = scope.spawn(|| {
                slot.wait_while_constructing();
                slot.state()
            });
            drop(claim);
            assert_eq!(waiter.join().unwrap(), SlotState::Empty);
        });
    }

    #[test]
    fn get_locked_reads_under_the_guard() {
        let guard = parking_lot::const_mutex(());
        let slot = HeapSlot::new();
        slot.publish(Box::new(4_u32));
        let _held = guard.lock();
        assert_eq!(slot.get_locked(&guard).copied(), Some(4));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without the guard")]
    fn get_locked_rejects_an_unheld_guard() {
        let guard = parking_lot::const_mutex(());
        let slot: HeapSlot<u32> = HeapSlot::new();
        let _ = slot.get_locked(&guard);
    }

    #[test]
    fn failed_build_returns_to_empty() {
        let slot: HeapSlot<u32> = HeapSlot::new();
        let err = slot
            .build(|| Err(Error::construction::<u32>("nope")))
            .unwrap_err();
        assert!(err.is_construction());
        assert_eq!(slot.state(), SlotState::Empty);
    }
}
