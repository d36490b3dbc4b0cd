//! Singleton pattern: four strategies for lazy, process-wide initialization.
//!
//! | strategy | holder | guard | single construction | identity |
//! |----------|--------|-------|---------------------|----------|
//! | A  | [`StaticLocal`] | once-cell | yes | yes |
//! | B  | [`NaiveLazy`] | none (Fixed: CAS claim + spin) | only in [`RaceMode::Fixed`] | only in [`RaceMode::Fixed`] |
//! | B+ | [`MutexLazy`] | mutex on every call | yes | yes |
//! | B++ | [`DoubleCheckedLazy`] | mutex on the cold path | yes | yes |
//!
//! Every holder takes its initializer at construction (`const fn new`), so
//! it can live in a `static` or be owned by a [`LazySingletonRegistry`].
//! Heap holders hand out `&T` borrowed from `&self`; explicit teardown
//! (`release`) needs `&mut self`, so no reference can outlive the instance.
//!
//! [`StaticLocal`] is the one to reach for.  The others exist to show what
//! goes wrong (B), what it costs to fix naively (B+), and what the fix needs
//! from the memory model (B++).

mod double_checked;
pub mod harness;
mod mutex;
mod naive;
mod registry;
mod slot;
mod static_local;

use std::fmt;

use crate::errors::Result;

pub use double_checked::DoubleCheckedLazy;
pub use mutex::MutexLazy;
pub use naive::{NaiveLazy, RaceMode};
pub use registry::LazySingletonRegistry;
pub use static_local::StaticLocal;

/// The get-or-create entry point shared by every strategy.
///
/// Every call, from any thread, returns a reference to the same instance
/// (except for [`NaiveLazy`] in [`RaceMode::Racy`]).  A failing initializer
/// is reported as [`Error::Construction`](crate::errors::Error::Construction)
/// and leaves the holder empty.
pub trait AccessPoint<T> {
    /// Return the instance, constructing it on first use.
    fn get_instance(&self) -> Result<&T>;
}

/// Lifecycle of the instance handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// No instance has been published.
    Empty,
    /// An initializer is running and nothing has been published yet.
    Constructing,
    /// An instance is published; terminal until `release`.
    Ready,
}

/// Selects one of the four initialization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Strategy A: one-time initialization cell, no explicit lock.
    StaticLocal,
    /// Strategy B: unsynchronized check-then-create.
    Naive,
    /// Strategy B+: mutex held for every access.
    Mutex,
    /// Strategy B++: double-checked locking with acquire/release publication.
    DoubleChecked,
}

impl Strategy {
    /// All strategies, in teaching order.
    pub const ALL: [Strategy; 4] = [
        Strategy::StaticLocal,
        Strategy::Naive,
        Strategy::Mutex,
        Strategy::DoubleChecked,
    ];

    /// Short kebab-case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Strategy::StaticLocal => "static-local",
            Strategy::Naive => "naive",
            Strategy::Mutex => "mutex",
            Strategy::DoubleChecked => "double-checked",
        }
    }

    /// Whether the strategy guarantees a single construction under
    /// concurrent first access.
    pub const fn is_thread_safe(&self) -> bool {
        !matches!(self, Strategy::Naive)
    }

    /// Whether the strategy supports explicit teardown.
    pub const fn supports_release(&self) -> bool {
        !matches!(self, Strategy::StaticLocal)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declare an accessor function backed by a function-local
/// [`StaticLocal`].
///
/// The initializer must be a `fn() -> Result<T>` (a path or a non-capturing
/// closure).  The instance is built on the first call and lives until the
/// process exits.
///
/// # Example
/// ```
/// use dp_core::define_singleton;
/// use dp_core::errors::Result;
///
/// pub struct Registry { names: Vec<&'static str> }
///
/// fn build_registry() -> Result<Registry> {
///     Ok(Registry { names: vec!["alpha", "beta"] })
/// }
///
/// define_singleton!(pub fn registry() -> Registry = build_registry);
///
/// let first = registry().unwrap();
/// let second = registry().unwrap();
/// assert!(std::ptr::eq(first, second));
/// assert_eq!(first.names.len(), 2);
/// ```
#[macro_export]
macro_rules! define_singleton {
    ($vis:vis fn $name:ident() -> $ty:ty = $init:expr) => {
        /// Return the process-wide instance, constructing it on first use.
        $vis fn $name() -> $crate::errors::Result<&'static $ty> {
            static CELL: $crate::patterns::singleton::StaticLocal<$ty> =
                $crate::patterns::singleton::StaticLocal::new($init);
            CELL.get_instance()
        }
    };
}
