//! # designpatterns
//!
//! Classic object-oriented design patterns, expressed in Rust.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates.  Application code should depend on this
//! crate rather than the individual `dp-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! designpatterns = "0.1"
//! ```
//!
//! ```rust
//! use designpatterns::core::patterns::singleton::DoubleCheckedLazy;
//!
//! static CACHE: DoubleCheckedLazy<Vec<u32>> = DoubleCheckedLazy::new(|| Ok(vec![1, 2, 3]));
//!
//! let cache = CACHE.get_instance().unwrap();
//! assert_eq!(cache.len(), 3);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Singleton strategies, observer pattern, errors, and settings.
pub use dp_core as core;

/// Priority-queue demonstrations.
pub use dp_collections as collections;

/// Commonly used items, importable with `use designpatterns::prelude::*`.
pub mod prelude {
    pub use dp_collections::{MaxHeap, MinHeap};
    pub use dp_core::{
        AccessPoint, DoubleCheckedLazy, Error, LazySingletonRegistry, MutexLazy, NaiveLazy,
        NonCopyable, Observable, Observer, RaceMode, Result, ScopedRaceMode, Settings, SlotState,
        StaticLocal, Strategy, Subject,
    };
}
