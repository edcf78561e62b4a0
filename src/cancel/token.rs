use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Why a token reports itself as fired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// `cancel()` was called.
    Canceled,
    /// The deadline supplied at construction elapsed.
    DeadlineExceeded,
}

/// Caller-owned cancellation signal, observed cooperatively.
///
/// Level-triggered: once fired it stays fired with the reason that fired
/// first, and every current and future observer sees it. Cloning shares the
/// same underlying state, so one token can be watched from any number of
/// threads.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<Option<CancelReason>>,
    cv: Condvar,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that only fires through `cancel()`.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A token that fires by itself once `timeout` has elapsed.
    ///
    /// A zero timeout yields a token that is already fired.
    #[must_use]
    pub fn with_deadline(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout))
    }

    fn build(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(None),
                cv: Condvar::new(),
                deadline,
            }),
        }
    }

    /// Fire the token. Idempotent: the first reason to fire wins.
    pub fn cancel(&self) {
        let mut state = self.lock_state();
        if state.is_none() {
            *state = Some(CancelReason::Canceled);
            self.inner.cv.notify_all();
        }
    }

    /// True once the token has fired, by explicit cancel or deadline.
    pub fn is_canceled(&self) -> bool {
        self.reason().is_some()
    }

    /// The reason the token fired, or `None` while it is still live.
    pub fn reason(&self) -> Option<CancelReason> {
        let mut state = self.lock_state();
        self.promote_deadline(&mut state);
        *state
    }

    /// Block until the token fires or `timeout` elapses.
    ///
    /// Returns `true` when the token is fired by the time the wait ends.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let wait_until = match Instant::now().checked_add(timeout) {
            Some(t) => t,
            None => return self.is_canceled(),
        };

        let mut state = self.lock_state();
        loop {
            self.promote_deadline(&mut state);
            if state.is_some() {
                return true;
            }

            let now = Instant::now();
            if now >= wait_until {
                return false;
            }

            let mut until = wait_until;
            if let Some(d) = self.inner.deadline {
                until = until.min(d);
            }

            let (guard, _) = self
                .inner
                .cv
                .wait_timeout(state, until.saturating_duration_since(now))
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<CancelReason>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a passed deadline as the firing reason, unless something fired
    /// first.
    fn promote_deadline(&self, state: &mut MutexGuard<'_, Option<CancelReason>>) {
        if state.is_none()
            && let Some(d) = self.inner.deadline
            && Instant::now() >= d
        {
            **state = Some(CancelReason::DeadlineExceeded);
            self.inner.cv.notify_all();
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::thread;

    #[test]
    fn fresh_token_is_live() {
        let token = CancelToken::new();
        assert!(!token.is_canceled());
        assert_eq!(token.reason(), None);
    }

    #[test]
    fn cancel_is_idempotent_and_level_triggered() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();

        assert!(token.is_canceled());
        assert_eq!(token.reason(), Some(CancelReason::Canceled));

        // A clone made after the fact observes the same state.
        let observer = token.clone();
        assert!(observer.is_canceled());
    }

    #[test]
    fn zero_deadline_is_already_fired() {
        let token = CancelToken::with_deadline(Duration::ZERO);
        assert!(token.is_canceled());
        assert_eq!(token.reason(), Some(CancelReason::DeadlineExceeded));
    }

    #[test]
    fn explicit_cancel_before_the_deadline_wins() {
        let token = CancelToken::with_deadline(Duration::from_millis(10));
        token.cancel();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(token.reason(), Some(CancelReason::Canceled));
    }

    #[test]
    fn wait_timeout_wakes_on_cancel_from_another_thread() {
        let token = CancelToken::new();
        let other = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            other.cancel();
        });

        let start = Instant::now();
        assert!(token.wait_timeout(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(4), "wait did not wake early");
    }

    #[test]
    fn wait_timeout_expires_on_a_live_token() {
        let token = CancelToken::new();
        assert!(!token.wait_timeout(Duration::from_millis(20)));
        assert!(!token.is_canceled());
    }

    #[test]
    fn deadline_fires_during_a_wait() {
        let token = CancelToken::with_deadline(Duration::from_millis(30));
        assert!(token.wait_timeout(Duration::from_secs(5)));
        assert_eq!(token.reason(), Some(CancelReason::DeadlineExceeded));
    }
}
