//! Process-wide library settings.
//!
//! [`Settings`] holds the **race mode** consulted by every
//! [`NaiveLazy`](crate::patterns::singleton::NaiveLazy) holder that was not
//! pinned to a mode of its own.  It is itself a process-wide singleton
//! accessed via a `std::sync::OnceLock`.
//!
//! The compile-time default comes from the `fixed-naive` cargo feature
//! ([`RaceMode::DEFAULT`]).  Tests that change the mode should do so through
//! [`ScopedRaceMode`], which restores the previous value on drop.
//!
//! The settings object cannot be copied out of its shared reference:
//!
//! ```compile_fail
//! use dp_core::Settings;
//! let owned: Settings = *Settings::instance();
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::patterns::singleton::RaceMode;

/// Process-wide settings used by designpatterns-rs.
pub struct Settings {
    race_mode: AtomicU8,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            race_mode: AtomicU8::new(RaceMode::DEFAULT.as_u8()),
        })
    }

    /// The race mode used by naive holders without a pinned mode.
    pub fn race_mode(&self) -> RaceMode {
        RaceMode::from_u8(self.race_mode.load(Ordering::Acquire))
    }

    /// Override the race mode for the whole process.
    pub fn set_race_mode(&self, mode: RaceMode) {
        log::debug!("[settings] race mode set to {mode:?}");
        self.race_mode.store(mode.as_u8(), Ordering::Release);
    }

    /// Restore the compile-time default race mode.
    pub fn reset_race_mode(&self) {
        self.set_race_mode(RaceMode::DEFAULT);
    }
}

/// RAII guard that sets the global race mode and restores the previous one
/// when dropped.
///
/// ```
/// use dp_core::{RaceMode, ScopedRaceMode, Settings};
///
/// let before = Settings::instance().race_mode();
/// {
///     let _guard = ScopedRaceMode::new(RaceMode::Fixed);
///     assert_eq!(Settings::instance().race_mode(), RaceMode::Fixed);
/// }
/// assert_eq!(Settings::instance().race_mode(), before);
/// ```
#[must_use = "the previous race mode is restored as soon as the guard is dropped"]
pub struct ScopedRaceMode {
    previous: RaceMode,
}

impl ScopedRaceMode {
    /// Switch the global race mode to `mode` until the guard is dropped.
    pub fn new(mode: RaceMode) -> Self {
        let settings = Settings::instance();
        let previous = settings.race_mode();
        settings.set_race_mode(mode);
        Self { previous }
    }
}

impl Drop for ScopedRaceMode {
    fn drop(&mut self) {
        Settings::instance().set_race_mode(self.previous);
    }
}

/// Serializes unit tests that touch the global race mode.
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_shared() {
        assert!(std::ptr::eq(Settings::instance(), Settings::instance()));
    }

    #[test]
    fn scoped_mode_restores() {
        let _lock = TEST_LOCK.lock();
        let settings = Settings::instance();
        settings.reset_race_mode();
        assert_eq!(settings.race_mode(), RaceMode::DEFAULT);
        {
            let _outer = ScopedRaceMode::new(RaceMode::Fixed);
            {
                let _inner = ScopedRaceMode::new(RaceMode::Racy);
                assert_eq!(settings.race_mode(), RaceMode::Racy);
            }
            assert_eq!(settings.race_mode(), RaceMode::Fixed);
        }
        assert_eq!(settings.race_mode(), RaceMode::DEFAULT);
    }
}
