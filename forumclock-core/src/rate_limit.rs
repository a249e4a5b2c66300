//! "At most once per interval" guard for user actions such as posting a
//! comment.
//!
//! The limiter remembers only the instant of the last accepted action. A
//! rejected check leaves that instant untouched, so hammering the limiter
//! does not extend the wait.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Default minimum spacing between accepted actions.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Default rejection message; `{time}` becomes the whole seconds left.
pub const DEFAULT_MESSAGE: &str = "Please wait {time} seconds";

/// Outcome of [`RateLimiter::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCheck {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,
}

impl RateCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            message: None,
            wait_ms: None,
        }
    }

    fn rejected(message: String, wait_ms: u64) -> Self {
        Self {
            allowed: false,
            message: Some(message),
            wait_ms: Some(wait_ms),
        }
    }
}

/// Accepts an action at most once per `min_interval`.
///
/// The last accepted instant is kept as epoch milliseconds and advanced with
/// compare-and-swap, so concurrent callers racing through the same window
/// see exactly one acceptance.
#[derive(Debug)]
pub struct RateLimiter<C: Clock = SystemClock> {
    min_interval_ms: i64,
    message: String,
    /// Epoch milliseconds of the last accepted action; 0 means never.
    last_action_ms: AtomicI64,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, SystemClock)
    }

    /// Build a limiter from its config section.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms)).with_message(&config.message)
    }
}

impl Default for RateLimiter<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(min_interval: Duration, clock: C) -> Self {
        Self {
            min_interval_ms: i64::try_from(min_interval.as_millis()).unwrap_or(i64::MAX),
            message: DEFAULT_MESSAGE.to_string(),
            last_action_ms: AtomicI64::new(0),
            clock,
        }
    }

    /// Replace the rejection message template.
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms as u64)
    }

    /// Try to accept an action now.
    pub fn check(&self) -> RateCheck {
        loop {
            let now = self.clock.now().timestamp_millis();
            let last = self.last_action_ms.load(Ordering::Acquire);
            let elapsed = now.saturating_sub(last);

            if elapsed < self.min_interval_ms {
                let wait_ms = (self.min_interval_ms - elapsed) as u64;
                let message = self.render_message(wait_ms);
                tracing::debug!(wait_ms, "Rate limit hit");
                return RateCheck::rejected(message, wait_ms);
            }

            if self
                .last_action_ms
                .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return RateCheck::allowed();
            }
            // Lost the race; re-read and decide again.
        }
    }

    /// Forget the last action so the next check passes.
    pub fn reset(&self) {
        self.last_action_ms.store(0, Ordering::Release);
    }

    fn render_message(&self, wait_ms: u64) -> String {
        let seconds = (wait_ms + 999) / 1000;
        self.message.replacen("{time}", &seconds.to_string(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_second_check_within_interval_is_rejected() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(1000), clock.clone());

        assert!(limiter.check().allowed);

        clock.advance(chrono::Duration::milliseconds(250));
        let rejected = limiter.check();
        assert!(!rejected.allowed);
        assert_eq!(rejected.wait_ms, Some(750));
        assert_eq!(rejected.message.as_deref(), Some("Please wait 1 seconds"));

        limiter.reset();
        assert!(limiter.check().allowed);
    }

    #[test]
    fn test_rejection_does_not_extend_wait() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(3000), clock.clone());

        assert!(limiter.check().allowed);
        clock.advance(chrono::Duration::milliseconds(2000));
        assert!(!limiter.check().allowed);
        clock.advance(chrono::Duration::milliseconds(1000));
        assert!(limiter.check().allowed);
    }

    #[test]
    fn test_message_rounds_seconds_up() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(3000), clock.clone())
            .with_message("Please wait {time} seconds before submitting another comment");

        assert!(limiter.check().allowed);
        clock.advance(chrono::Duration::milliseconds(1));
        let check = limiter.check();
        assert_eq!(check.wait_ms, Some(2999));
        assert_eq!(
            check.message.as_deref(),
            Some("Please wait 3 seconds before submitting another comment")
        );

        clock.advance(chrono::Duration::milliseconds(1999));
        assert_eq!(
            limiter.check().message.as_deref(),
            Some("Please wait 1 seconds before submitting another comment")
        );
    }

    #[test]
    fn test_only_first_placeholder_is_replaced() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(5000), clock.clone())
            .with_message("{time}s ({time})");
        limiter.check();
        assert_eq!(limiter.check().message.as_deref(), Some("5s ({time})"));
    }

    #[test]
    fn test_exact_interval_is_allowed() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(1000), clock.clone());
        assert!(limiter.check().allowed);
        clock.advance(chrono::Duration::milliseconds(1000));
        assert!(limiter.check().allowed);
    }

    #[test]
    fn test_limiters_do_not_share_state() {
        let clock = clock();
        let a = RateLimiter::with_clock(Duration::from_secs(10), clock.clone());
        let b = RateLimiter::with_clock(Duration::from_secs(10), clock.clone());
        assert!(a.check().allowed);
        assert!(b.check().allowed);
        assert!(!a.check().allowed);
    }

    #[test]
    fn test_concurrent_checks_admit_one() {
        let limiter = Arc::new(RateLimiter::with_clock(Duration::from_secs(60), clock()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.check().allowed)
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(admitted, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let clock = clock();
        let limiter = RateLimiter::with_clock(Duration::from_millis(1000), clock.clone());

        let allowed = serde_json::to_value(limiter.check()).unwrap();
        assert_eq!(allowed, serde_json::json!({ "allowed": true }));

        let rejected = serde_json::to_value(limiter.check()).unwrap();
        assert_eq!(
            rejected,
            serde_json::json!({
                "allowed": false,
                "message": "Please wait 1 seconds",
                "waitMs": 1000
            })
        );
    }

    #[test]
    fn test_from_config() {
        let limiter = RateLimiter::from_config(&RateLimitConfig::comments());
        assert_eq!(limiter.min_interval(), Duration::from_millis(3000));
        assert!(limiter.check().allowed);
        let check = limiter.check();
        assert!(!check.allowed);
        assert!(check
            .message
            .unwrap()
            .ends_with("seconds before submitting another comment"));
    }
}
