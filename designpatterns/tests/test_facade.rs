//! End-to-end use of the façade: a process-wide event bus built from the
//! singleton and observer patterns.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use designpatterns::core::define_singleton;
use designpatterns::core::patterns::observable::{ObserverA, ObserverB};
use designpatterns::prelude::*;

struct EventBus {
    _marker: NonCopyable,
    published: AtomicUsize,
}

fn open_bus() -> Result<EventBus> {
    Ok(EventBus {
        _marker: NonCopyable::new(),
        published: AtomicUsize::new(0),
    })
}

define_singleton!(fn event_bus() -> EventBus = open_bus);

#[test]
fn bus_is_shared_across_threads() {
    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let bus = event_bus().unwrap();
                    bus.published.fetch_add(1, Ordering::SeqCst);
                    bus as *const EventBus as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert!(event_bus().unwrap().published.load(Ordering::SeqCst) >= 8);
}

#[test]
fn subject_fans_out_to_both_observers() {
    let a = Arc::new(ObserverA::new());
    let b = Arc::new(ObserverB::new());
    let subject = Subject::new();
    subject.register_observer(Arc::downgrade(&a) as std::sync::Weak<dyn Observer>);
    subject.register_observer(Arc::downgrade(&b) as std::sync::Weak<dyn Observer>);

    subject.notify_observers();
    subject.notify_observers();

    assert_eq!(a.updates(), 2);
    assert_eq!(b.updates(), 2);
}

#[test]
fn registry_and_heap_together() {
    let registry: LazySingletonRegistry<MinHeap<u32>> =
        LazySingletonRegistry::new(Strategy::Mutex, || Ok([4, 1, 3].into_iter().collect()));
    let heap = registry.get_instance().unwrap();
    assert_eq!(heap.peek(), Some(&1));
    assert_eq!(registry.state(), SlotState::Ready);
}
