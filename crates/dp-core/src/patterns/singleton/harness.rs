//! Concurrent access harness shared by the tests and benchmarks.
//!
//! [`race_access`] lines `threads` scoped threads up behind a barrier and
//! releases them into `get_instance` at the same moment, which is the
//! condition under which a broken strategy builds more than one instance.

use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;

use super::AccessPoint;
use crate::ensure;
use crate::errors::Result;

/// What each racing thread saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceReport {
    addresses: Vec<usize>,
}

impl RaceReport {
    /// Address of the instance returned to each thread, in spawn order.
    pub fn addresses(&self) -> &[usize] {
        &self.addresses
    }

    /// Number of threads that took part.
    pub fn threads(&self) -> usize {
        self.addresses.len()
    }

    /// Number of distinct instances handed out.
    pub fn distinct(&self) -> usize {
        self.addresses.iter().collect::<HashSet<_>>().len()
    }

    /// `true` if every thread got the same instance.
    pub fn is_unanimous(&self) -> bool {
        self.distinct() <= 1
    }
}

/// Call `holder.get_instance()` from `threads` threads at once.
///
/// Returns the first error any thread received.  A panicking thread
/// propagates its panic.
pub fn race_access<T, A>(holder: &A, threads: usize) -> Result<RaceReport>
where
    A: AccessPoint<T> + Sync,
{
    race_access_with(holder, threads, |_| {})
}

/// Like [`race_access`], but runs `inspect` on the instance inside every
/// thread, right after it was obtained.
pub fn race_access_with<T, A, I>(holder: &A, threads: usize, inspect: I) -> Result<RaceReport>
where
    A: AccessPoint<T> + Sync,
    I: Fn(&T) + Sync,
{
    ensure!(threads > 0, "race_access needs at least one thread");

    let barrier = Barrier::new(threads);
    let outcomes: Vec<Result<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| -> Result<usize> {
                    barrier.wait();
                    let instance = holder.get_instance()?;
                    inspect(instance);
                    Ok(instance as *const T as usize)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });

    let addresses = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
    log::debug!(
        "[harness] {} threads saw {} distinct instance(s)",
        addresses.len(),
        addresses.iter().collect::<HashSet<_>>().len()
    );
    Ok(RaceReport { addresses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::patterns::singleton::MutexLazy;

    #[test]
    fn zero_threads_is_rejected() {
        let holder: MutexLazy<u8> = MutexLazy::new(|| Ok(0));
        assert!(matches!(
            race_access(&holder, 0),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn report_counts_distinct() {
        let report = RaceReport {
            addresses: vec![8, 8, 16],
        };
        assert_eq!(report.threads(), 3);
        assert_eq!(report.distinct(), 2);
        assert!(!report.is_unanimous());
    }

    #[test]
    fn errors_are_returned() {
        let holder: MutexLazy<u8> =
            MutexLazy::new(|| Err(Error::construction::<u8>("always fails")));
        let err = race_access(&holder, 4).unwrap_err();
        assert!(err.is_construction());
    }

    #[test]
    fn inspect_runs_in_every_thread() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let holder: MutexLazy<u8> = MutexLazy::new(|| Ok(4));
        let seen = AtomicUsize::new(0);
        let report = race_access_with(&holder, 8, |v| {
            assert_eq!(*v, 4);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert!(report.is_unanimous());
        assert_eq!(seen.load(Ordering::SeqCst), 8);
    }
}
