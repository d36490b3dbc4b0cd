//! # dp-core
//!
//! Core types, traits, and error definitions for designpatterns-rs.
//!
//! This crate holds the pattern demonstrations themselves: the four
//! singleton strategies and their registry, the observer pattern, the
//! non-copyable marker, the error hierarchy, and process-wide `Settings`.
//!
//! The singleton holders publish heap instances through raw atomic
//! pointers.  That code lives in `patterns::singleton::slot`, the one module
//! exempt from `deny(unsafe_code)`; every block there carries a `SAFETY:`
//! note.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

/// Marker type that forbids `Clone`/`Copy` on its owner.
pub mod noncopyable;

/// Design patterns: observable, singleton.
pub mod patterns;

/// Global library settings (race mode of the naive singleton).
pub mod settings;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use noncopyable::NonCopyable;
pub use patterns::observable::{Observable, Observer, Subject};
pub use patterns::singleton::{
    AccessPoint, DoubleCheckedLazy, LazySingletonRegistry, MutexLazy, NaiveLazy, RaceMode,
    SlotState, StaticLocal, Strategy,
};
pub use settings::{ScopedRaceMode, Settings};
