//! Observer / Observable pattern.
//!
//! * A **subject** notifies registered **observers** whenever it changes.
//! * Observers react by calling `update()`.
//!
//! Two registration styles are supported:
//! * [`Subject`] takes ownership of boxed observers (or plain callbacks) and
//!   keeps them for its whole lifetime.
//! * [`ObserverList`] holds `Weak` references, so observers owned elsewhere
//!   drop out of the list once they are gone.
//!
//! Interior mutability (`RefCell`) lets registration and notification work
//! through `&self`.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// An object that can notify interested parties when it changes.
pub trait Observable {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>);

    /// Notify all currently registered observers that this object has changed.
    fn notify_observers(&self);
}

/// An object that reacts to changes in the subjects it is registered with.
pub trait Observer: Send + Sync {
    /// Called by every subject this observer is registered with when that
    /// subject changes state.
    fn update(&self);
}

/// Weak observer list, pruned of dead entries on every notification.
pub struct ObserverList {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

impl Default for ObserverList {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverList {
    /// Create a new, empty list.
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Remove an observer (by pointer equality of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .borrow_mut()
            .retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Number of registered entries, dead or alive.
    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify all live observers, removing dead `Weak` references as we go.
    pub fn notify(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        // Outside the borrow, so an observer may register another one.
        for observer in live {
            observer.update();
        }
    }
}

/// Adapts a closure to the [`Observer`] trait.
pub struct FnObserver<F>(F);

impl<F> FnObserver<F>
where
    F: Fn() + Send + Sync,
{
    /// Wrap `callback`.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> Observer for FnObserver<F>
where
    F: Fn() + Send + Sync,
{
    fn update(&self) {
        (self.0)()
    }
}

/// A subject that owns its observers and also accepts weak registrations.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use dp_core::patterns::observable::{ObserverA, ObserverB, Subject};
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let mut subject = Subject::new();
/// subject.append(Box::new(ObserverA::new()));
/// subject.append(Box::new(ObserverB::new()));
/// let counter = Arc::clone(&hits);
/// subject.register(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subject.notify();
/// subject.notify();
/// assert_eq!(subject.len(), 3);
/// assert_eq!(hits.load(Ordering::SeqCst), 2);
/// ```
#[derive(Default)]
pub struct Subject {
    owned: Vec<Box<dyn Observer>>,
    watchers: ObserverList,
}

impl Subject {
    /// Create a subject with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `observer`; it is notified after every observer
    /// appended before it.
    pub fn append(&mut self, observer: Box<dyn Observer>) {
        self.owned.push(observer);
    }

    /// Register a callback as an owned observer.
    pub fn register<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.append(Box::new(FnObserver::new(callback)));
    }

    /// Number of owned observers.
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    /// `true` if no observer is owned.
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Notify owned observers in registration order, then weak ones.
    pub fn notify(&self) {
        log::trace!(
            "[subject] notifying {} owned and {} weak observer(s)",
            self.owned.len(),
            self.watchers.len()
        );
        for observer in &self.owned {
            observer.update();
        }
        self.watchers.notify();
    }
}

impl Observable for Subject {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.watchers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.watchers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.notify();
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("owned", &self.owned.len())
            .field("weak", &self.watchers.len())
            .finish()
    }
}

macro_rules! counting_observer {
    ($name:ident) => {
        #[doc = concat!("Demonstration observer that logs and counts its updates (`", stringify!($name), "`).")]
        #[derive(Debug, Default)]
        pub struct $name {
            updates: AtomicUsize,
        }

        impl $name {
            /// Create an observer that has seen no updates.
            pub fn new() -> Self {
                Self::default()
            }

            /// Number of updates received so far.
            pub fn updates(&self) -> usize {
                self.updates.load(Ordering::Relaxed)
            }
        }

        impl Observer for $name {
            fn update(&self) {
                self.updates.fetch_add(1, Ordering::Relaxed);
                log::info!(concat!(stringify!($name), " update!"));
            }
        }
    };
}

counting_observer!(ObserverA);
counting_observer!(ObserverB);
