//! Strategy B: naive lazy heap allocation.
//!
//! **Not thread-safe in [`RaceMode::Racy`].**  The check and the store are
//! two separate steps, so threads racing on an empty holder can each build
//! an instance and overwrite the pointer.  Overwritten instances are leaked
//! (never freed), so the references already handed out stay valid, but
//! callers may end up holding different instances.
//!
//! [`RaceMode::Fixed`] patches the same code path without a lock: a caller
//! that finds the holder empty must first claim construction with a
//! compare-and-swap.  Callers that lose the claim spin until the winner
//! publishes, so the initializer runs once and every caller sees the same
//! instance.  If the winner fails, the claim is dropped and a waiter makes
//! its own attempt.
//!
//! A holder created with [`NaiveLazy::new`] follows
//! [`Settings::race_mode`](crate::Settings::race_mode), whose default is
//! chosen at build time by the `fixed-naive` feature.

use super::slot::HeapSlot;
use super::{AccessPoint, SlotState};
use crate::errors::Result;
use crate::settings::Settings;

/// How [`NaiveLazy`] publishes a freshly built instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceMode {
    /// Unsynchronized check-then-store (the defect, reproduced).
    Racy,
    /// Claim-then-build; one construction, one identity.
    Fixed,
}

impl RaceMode {
    /// Compile-time default: `Fixed` with the `fixed-naive` feature, `Racy`
    /// otherwise.
    pub const DEFAULT: RaceMode = if cfg!(feature = "fixed-naive") {
        RaceMode::Fixed
    } else {
        RaceMode::Racy
    };

    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            RaceMode::Racy => 0,
            RaceMode::Fixed => 1,
        }
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => RaceMode::Fixed,
            _ => RaceMode::Racy,
        }
    }
}

/// Lazily allocated holder with no guard around check-and-create.
pub struct NaiveLazy<T, F = fn() -> Result<T>> {
    slot: HeapSlot<T>,
    mode: Option<RaceMode>,
    init: F,
}

impl<T, F> NaiveLazy<T, F> {
    /// Create an empty holder following the process-wide race mode.
    pub const fn new(init: F) -> Self {
        Self {
            slot: HeapSlot::new(),
            mode: None,
            init,
        }
    }

    /// Create an empty holder pinned to `mode`.
    pub const fn with_mode(init: F, mode: RaceMode) -> Self {
        Self {
            slot: HeapSlot::new(),
            mode: Some(mode),
            init,
        }
    }

    /// The race mode the next `get_instance` call will use.
    pub fn mode(&self) -> RaceMode {
        self.mode
            .unwrap_or_else(|| Settings::instance().race_mode())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    /// Detach the current instance, leaving the holder empty.
    ///
    /// Instances leaked by a racy overwrite are not returned.
    pub fn release(&mut self) -> Option<Box<T>> {
        let released = self.slot.take();
        if released.is_some() {
            log::debug!("[singleton] released naive {}", std::any::type_name::<T>());
        }
        released
    }
}

impl<T, F> NaiveLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    /// Return the instance, constructing it if the holder looks empty.
    pub fn get_instance(&self) -> Result<&T> {
        if let Some(existing) = self.slot.get() {
            return Ok(existing);
        }
        match self.mode() {
            RaceMode::Racy => {
                // Another thread may pass the same check before either of us stores.
                let fresh = self.slot.build(&self.init)?;
                Ok(self.slot.publish(fresh).0)
            }
            RaceMode::Fixed => self.claim_and_build(),
        }
    }

    fn claim_and_build(&self) -> Result<&T> {
        loop {
            if let Some(existing) = self.slot.get() {
                return Ok(existing);
            }
            if let Some(_claim) = self.slot.claim() {
                let fresh = self.slot.build(&self.init)?;
                // Publish before `_claim` drops so no waiter can claim again.
                return Ok(self.slot.publish_if_empty(fresh).0);
            }
            self.slot.wait_while_constructing();
        }
    }
}

impl<T, F> AccessPoint<T> for NaiveLazy<T, F>
where
    F: Fn() -> Result<T>,
{
    fn get_instance(&self) -> Result<&T> {
        NaiveLazy::get_instance(self)
    }
}
