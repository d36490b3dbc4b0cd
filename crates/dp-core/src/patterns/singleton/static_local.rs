//! Strategy A: one-time initialization without an explicit lock.
//!
//! The holder wraps a `once_cell::sync::OnceCell`, which guarantees that
//! exactly one initializer runs to completion and that every other caller
//! blocks until the value is published.  Nothing about the guard is exposed.
//!
//! Placed in a `static` (see [`define_singleton!`](crate::define_singleton))
//! the instance lives until the process exits; Rust never runs destructors
//! for statics.  Owned by a value, it is dropped with its owner.
//!
//! The holder is not `Clone`, so it cannot be duplicated:
//!
//! ```compile_fail
//! use dp_core::patterns::singleton::StaticLocal;
//!
//! let holder: StaticLocal<u32> = StaticLocal::new(|| Ok(1));
//! let copy = holder.clone();
//! ```

use once_cell::sync::OnceCell;

use super::{AccessPoint, SlotState};
use crate::errors::Result;

/// Lazily initialized holder relying on a once-cell for thread safety.
///
/// ```
/// use dp_core::patterns::singleton::StaticLocal;
///
/// static CONFIG: StaticLocal<Vec<&str>> = StaticLocal::new(|| Ok(vec!["a", "b"]));
///
/// let config = CONFIG.get_instance().unwrap();
/// assert_eq!(config.len(), 2);
/// assert!(std::ptr::eq(config, CONFIG.get_instance().unwrap()));
/// ```
pub struct StaticLocal<T, F = fn() -> Result<T>> {
    cell: OnceCell<T>,
    init: F,
}

impl<T, F> StaticLocal<T, F> {
    /// Create an empty holder that will build its instance with `init`.
    pub const fn new(init: F) -> Self {
        Self {
            cell: OnceCell::new(),
            init,
        }
    }

    /// Return the instance if it has already been built.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// `Ready` once initialized, `Empty` otherwise.
    pub fn state(&self) -> SlotState {
        if self.cell.get().is_some() {
            SlotState::Ready
        } else {
            SlotState::Empty
        }
    }
}

impl<T, F> StaticLocal<T, F>
where
    F: Fn() -> Result<T>,
{
    /// Return the instance, constructing it on first use.
    ///
    /// A failing initializer leaves the cell empty; the next call runs the
    /// initializer again.
    pub fn get_instance(&self) -> Result<&T> {
        self.cell.get_or_try_init(|| {
            log::debug!("[singleton] constructing {}", std::any::type_name::<T>());
            (self.init)()
        })
    }
}

impl<T, F> AccessPoint<T> for StaticLocal<T, F>
where
    F: Fn() -> Result<T>,
{
    fn get_instance(&self) -> Result<&T> {
        StaticLocal::get_instance(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builds_once() {
        let calls = AtomicUsize::new(0);
        let holder = StaticLocal::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(String::from("ready"))
        });
        assert_eq!(holder.state(), SlotState::Empty);
        assert!(holder.get().is_none());

        let first = holder.get_instance().unwrap();
        let second = holder.get_instance().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, "ready");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(holder.state(), SlotState::Ready);
    }

    #[test]
    fn failure_leaves_cell_empty() {
        let calls = AtomicUsize::new(0);
        let holder = StaticLocal::new(|| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::construction::<u8>("first attempt fails"))
            } else {
                Ok(9_u8)
            }
        });
        let err = holder.get_instance().unwrap_err();
        assert!(err.is_construction());
        assert_eq!(holder.state(), SlotState::Empty);

        assert_eq!(*holder.get_instance().unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn usable_from_a_static() {
        static HOLDER: StaticLocal<u64> = StaticLocal::new(|| Ok(0xfeed));
        assert_eq!(*HOLDER.get_instance().unwrap(), 0xfeed);
    }
}
