//! Non-copyable marker capability.
//!
//! Rust types are move-only unless they opt into `Clone`/`Copy`, so the
//! marker carries no behavior of its own.  Its job is to make the intent
//! explicit and enforced: a type embedding a [`NonCopyable`] field can no
//! longer derive either trait.
//!
//! ```compile_fail
//! use dp_core::NonCopyable;
//!
//! #[derive(Clone)]
//! struct Registry {
//!     _marker: NonCopyable,
//! }
//! ```
//!
//! ```compile_fail
//! use dp_core::NonCopyable;
//!
//! #[derive(Clone, Copy)]
//! struct Handle {
//!     _marker: NonCopyable,
//! }
//! ```
//!
//! Copy-assignment through a shared reference is rejected as well:
//!
//! ```compile_fail
//! use dp_core::NonCopyable;
//!
//! let original = NonCopyable::new();
//! let borrowed = &original;
//! let duplicate: NonCopyable = *borrowed;
//! ```
//!
//! Moving is still allowed, which is what makes it usable as a field:
//!
//! ```
//! use dp_core::NonCopyable;
//!
//! struct Registry {
//!     _marker: NonCopyable,
//!     entries: Vec<u32>,
//! }
//!
//! let registry = Registry { _marker: NonCopyable::new(), entries: vec![1] };
//! let moved = registry;
//! assert_eq!(moved.entries, [1]);
//! ```

use std::fmt;

/// Zero-sized marker that is neither `Clone` nor `Copy`.
///
/// The only way to obtain one is [`NonCopyable::new`]; the private field keeps
/// struct-literal construction out of other crates.
#[derive(Default, PartialEq, Eq, Hash)]
pub struct NonCopyable {
    _private: (),
}

impl NonCopyable {
    /// Create the marker.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl fmt::Debug for NonCopyable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NonCopyable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized() {
        assert_eq!(std::mem::size_of::<NonCopyable>(), 0);
        assert_eq!(NonCopyable::new(), NonCopyable::default());
        assert_eq!(format!("{:?}", NonCopyable::new()), "NonCopyable");
    }
}
