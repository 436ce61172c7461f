//! Monotonic nonce generation.
//!
//! The exchange requires per-signer nonces that are unique and roughly
//! track wall-clock milliseconds. The manager guarantees strict local
//! monotonicity even under clock regression; uniqueness across processes
//! remains the caller's responsibility.

use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64
    }
}

/// Issues millisecond nonces that never repeat or decrease.
///
/// `next` returns `max(last + 1, now_ms)`, advanced through a CAS loop so
/// concurrent callers on any thread get distinct values.
pub struct NonceManager<C: Clock> {
    counter: AtomicU64,
    clock: C,
}

impl<C: Clock> NonceManager<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            counter: AtomicU64::new(now),
            clock,
        }
    }

    /// Generate the next nonce value.
    pub fn next(&self) -> u64 {
        let target = self.clock.now_ms();
        loop {
            let current = self.counter.load(Ordering::Acquire);
            let next_val = current.saturating_add(1).max(target);
            match self.counter.compare_exchange_weak(
                current,
                next_val,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next_val,
                Err(_) => continue,
            }
        }
    }
}

impl NonceManager<SystemClock> {
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    struct MockClock {
        time_ms: AtomicU64,
    }

    impl MockClock {
        fn new(initial_ms: u64) -> Self {
            Self {
                time_ms: AtomicU64::new(initial_ms),
            }
        }

        fn set(&self, time_ms: u64) {
            self.time_ms.store(time_ms, Ordering::Release);
        }
    }

    impl Clock for MockClock {
        fn now_ms(&self) -> u64 {
            self.time_ms.load(Ordering::Acquire)
        }
    }

    impl Clock for Arc<MockClock> {
        fn now_ms(&self) -> u64 {
            self.time_ms.load(Ordering::Acquire)
        }
    }

    const BASE_TIME: u64 = 1_700_000_000_000;

    #[test]
    fn test_monotonic_increase() {
        let manager = NonceManager::new(MockClock::new(BASE_TIME));
        let mut prev = 0u64;
        for _ in 0..1000 {
            let nonce = manager.next();
            assert!(nonce > prev, "nonce must be strictly increasing");
            prev = nonce;
        }
    }

    #[test]
    fn test_tracks_wall_clock() {
        let clock = Arc::new(MockClock::new(BASE_TIME));
        let manager = NonceManager::new(Arc::clone(&clock));
        assert!(manager.next() >= BASE_TIME);
        clock.set(BASE_TIME + 60_000);
        assert!(manager.next() >= BASE_TIME + 60_000);
    }

    #[test]
    fn test_clock_regression_does_not_decrease() {
        let clock = Arc::new(MockClock::new(BASE_TIME));
        let manager = NonceManager::new(Arc::clone(&clock));
        let n1 = manager.next();
        clock.set(BASE_TIME - 10_000);
        let n2 = manager.next();
        assert!(n2 > n1, "nonce must not decrease when the clock regresses");
    }

    #[test]
    fn test_concurrent_no_duplicates() {
        let clock = Arc::new(MockClock::new(BASE_TIME));
        let manager = Arc::new(NonceManager::new(Arc::clone(&clock)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || (0..1000).map(|_| manager.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total, "all nonces must be unique across threads");
    }
}
