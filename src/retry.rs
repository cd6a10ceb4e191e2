use std::time::Duration;

use log::warn;

use crate::error::{PlayerError, ProviderError};

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Retries timed-out provider calls a fixed number of times.
///
/// Any other failure is returned immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn run<T>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut call: impl FnMut() -> Result<T, ProviderError>,
    ) -> Result<T, PlayerError> {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_timeout() => {
                    warn!(
                        "{label}: timeout, waiting {:?} (attempt {attempt}/{attempts})",
                        self.delay
                    );
                    sleeper.sleep(self.delay);
                    if attempt >= attempts {
                        return Err(PlayerError::ExternalTimeout {
                            attempts,
                            source: err,
                        });
                    }
                }
                Err(err) => return Err(PlayerError::Unexpected(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use super::{RetryPolicy, Sleeper};
    use crate::error::{PlayerError, ProviderError};

    #[derive(Default)]
    struct RecordingSleeper {
        naps: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.naps.borrow_mut().push(duration);
        }
    }

    #[test]
    fn recovers_after_timeouts() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_secs(5));
        let out = policy.run(&sleeper, "test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(ProviderError::Timeout("slow".into()))
            } else {
                Ok(7)
            }
        });
        assert_eq!(out.ok(), Some(7));
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.naps.borrow().len(), 2);
    }

    #[test]
    fn exhausts_into_external_timeout() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let out: Result<(), _> = policy.run(&sleeper, "test", || {
            calls.set(calls.get() + 1);
            Err(ProviderError::Timeout("slow".into()))
        });
        assert!(matches!(
            out,
            Err(PlayerError::ExternalTimeout { attempts: 3, .. })
        ));
        assert_eq!(calls.get(), 3);
        assert_eq!(
            *sleeper.naps.borrow(),
            vec![Duration::from_millis(10); 3]
        );
    }

    #[test]
    fn other_errors_are_not_retried() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);
        let out: Result<(), _> = RetryPolicy::default().run(&sleeper, "test", || {
            calls.set(calls.get() + 1);
            Err(ProviderError::Http {
                status: 500,
                body: String::new(),
            })
        });
        assert!(matches!(out, Err(PlayerError::Unexpected(_))));
        assert_eq!(calls.get(), 1);
        assert!(sleeper.naps.borrow().is_empty());
    }
}
