//! Error types for designpatterns-rs.
//!
//! Every fallible operation in the workspace reports a single
//! `thiserror`-derived enum.  A failing singleton initializer surfaces as
//! [`Error::Construction`]; the holder stays empty so the caller may try again.

use thiserror::Error;

/// The top-level error type used throughout designpatterns-rs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The initializer of a lazily constructed instance failed.
    #[error("failed to construct `{type_name}`: {reason}")]
    Construction {
        /// Name of the type that could not be built.
        type_name: &'static str,
        /// Human readable cause reported by the initializer.
        reason: String,
    },

    /// Explicit teardown was requested from a strategy that only releases
    /// its instance at process teardown.
    #[error("strategy `{strategy}` does not support explicit teardown")]
    TeardownUnsupported {
        /// Name of the strategy that refused the request.
        strategy: &'static str,
    },

    /// Precondition violated (raised by [`ensure!`](crate::ensure)).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),
}

impl Error {
    /// Build an [`Error::Construction`] for type `T`.
    ///
    /// ```
    /// use dp_core::errors::Error;
    ///
    /// struct Database;
    /// let err = Error::construction::<Database>("connection refused");
    /// assert!(err.to_string().contains("Database"));
    /// assert!(err.to_string().contains("connection refused"));
    /// ```
    pub fn construction<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Return `true` if this error came from a failing initializer.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }
}

/// Shorthand `Result` type used throughout designpatterns-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use dp_core::{ensure, errors::Error};
/// fn positive(x: i64) -> dp_core::errors::Result<i64> {
///     ensure!(x > 0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1).is_ok());
/// assert_eq!(
///     positive(-1),
///     Err(Error::Precondition("x must be positive, got -1".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn construction_names_the_type() {
        let err = Error::construction::<Widget>("boom");
        match &err {
            Error::Construction { type_name, reason } => {
                assert!(type_name.ends_with("Widget"));
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert!(err.is_construction());
    }

    #[test]
    fn teardown_message() {
        let err = Error::TeardownUnsupported {
            strategy: "static-local",
        };
        assert_eq!(
            err.to_string(),
            "strategy `static-local` does not support explicit teardown"
        );
        assert!(!err.is_construction());
    }

    fn needs_even(n: u32) -> Result<u32> {
        crate::ensure!(n % 2 == 0, "{n} is odd");
        Ok(n / 2)
    }

    #[test]
    fn ensure_macro() {
        assert_eq!(needs_even(4), Ok(2));
        assert_eq!(needs_even(3), Err(Error::Precondition("3 is odd".into())));
    }
}
