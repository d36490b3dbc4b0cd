//! `LazySingletonRegistry`: one instance of `T` under a strategy chosen at
//! runtime.

use super::{
    AccessPoint, DoubleCheckedLazy, MutexLazy, NaiveLazy, SlotState, StaticLocal, Strategy,
};
use crate::errors::{Error, Result};

enum Holder<T, F> {
    StaticLocal(StaticLocal<T, F>),
    Naive(NaiveLazy<T, F>),
    Mutex(MutexLazy<T, F>),
    DoubleChecked(DoubleCheckedLazy<T, F>),
}

/// Owns a single lazily constructed `T`, built with the selected
/// [`Strategy`].
///
/// ```
/// use dp_core::patterns::singleton::{LazySingletonRegistry, SlotState, Strategy};
///
/// let mut registry: LazySingletonRegistry<String> =
///     LazySingletonRegistry::new(Strategy::DoubleChecked, || Ok("shared".to_string()));
///
/// assert_eq!(registry.get_instance().unwrap(), "shared");
/// assert_eq!(registry.state(), SlotState::Ready);
///
/// let released = registry.release().unwrap();
/// assert_eq!(released.as_deref().map(String::as_str), Some("shared"));
/// assert_eq!(registry.state(), SlotState::Empty);
/// ```
pub struct LazySingletonRegistry<T, F = fn() -> Result<T>> {
    holder: Holder<T, F>,
}

impl<T, F> LazySingletonRegistry<T, F> {
    /// Create an empty registry using `strategy` and `init`.
    pub fn new(strategy: Strategy, init: F) -> Self {
        let holder = match strategy {
            Strategy::StaticLocal => Holder::StaticLocal(StaticLocal::new(init)),
            Strategy::Naive => Holder::Naive(NaiveLazy::new(init)),
            Strategy::Mutex => Holder::Mutex(MutexLazy::new(init)),
            Strategy::DoubleChecked => Holder::DoubleChecked(DoubleCheckedLazy::new(init)),
        };
        Self { holder }
    }

    /// The strategy this registry was created with.
    pub fn strategy(&self) -> Strategy {
        match &self.holder {
            Holder::StaticLocal(_) => Strategy::StaticLocal,
            Holder::Naive(_) => Strategy::Naive,
            Holder::Mutex(_) => Strategy::Mutex,
            Holder::DoubleChecked(_) => Strategy::DoubleChecked,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        match &self.holder {
            Holder::StaticLocal(h) => h.state(),
            Holder::Naive(h) => h.state(),
            Holder::Mutex(h) => h.state(),
            Holder::DoubleChecked(h) => h.state(),
        }
    }

    /// Detach the instance, leaving the registry empty.
    ///
    /// Returns `Ok(None)` if nothing was built yet, and
    /// [`Error::TeardownUnsupported`] for [`Strategy::StaticLocal`], whose
    /// instance only goes away with the registry itself.
    pub fn release(&mut self) -> Result<Option<Box<T>>> {
        match &mut self.holder {
            Holder::StaticLocal(_) => Err(Error::TeardownUnsupported {
                strategy: Strategy::StaticLocal.name(),
            }),
            Holder::Naive(h) => Ok(h.release()),
            Holder::Mutex(h) => Ok(h.release()),
            Holder::DoubleChecked(h) => Ok(h.release()),
        }
    }
}

impl<T, F> LazySingletonRegistry<T, F>
where
    F: Fn() -> Result<T>,
{
    /// Return the instance, constructing it on first use.
    pub fn get_instance(&self) -> Result<&T> {
        match &self.holder {
            Holder::StaticLocal(h) => h.get_instance(),
            Holder::Naive(h) => h.get_instance(),
            Holder::Mutex(h) => h.get_instance(),
            Holder::DoubleChecked(h) => h.get_instance(),
        }
    }
}

impl<T, F> AccessPoint<T> for LazySingletonRegistry<T, F>
where
    F: Fn() -> Result<T>,
{
    fn get_instance(&self) -> Result<&T> {
        LazySingletonRegistry::get_instance(self)
    }
}
