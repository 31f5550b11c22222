//! Quiet-period debouncing of search input.
//!
//! [`Debouncer`] is a clocked state machine: callers feed it raw values with
//! the time they arrived and poll it with the current time. It yields a
//! value only after the input has been quiet for the configured period, and
//! only when the trimmed value differs from the last one it yielded.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period before a search settles.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Settles rapidly changing input into at most one value per quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period.
    quiet: Duration,
    /// Latest raw value and when it arrived.
    pending: Option<(String, Instant)>,
    /// Last value yielded (trimmed).
    last_emitted: Option<String>,
}

impl Debouncer {
    /// Creates a debouncer that has not yielded anything yet.
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    /// Creates a debouncer that treats `value` as already yielded.
    ///
    /// Used when the initial query has been submitted directly, so settling
    /// back to it does not trigger a duplicate request.
    #[must_use]
    pub fn with_initial(quiet: Duration, value: &str) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: Some(String::from(value.trim())),
        }
    }

    /// Records the latest raw value and restarts the quiet period.
    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        self.pending = Some((raw.into(), now));
    }

    /// Returns the instant at which the pending value settles.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .and_then(|(_, at)| at.checked_add(self.quiet))
    }

    /// Yields the settled value once the quiet period has elapsed.
    ///
    /// Returns `None` while input is still arriving, when nothing is pending,
    /// or when the trimmed value equals the last value yielded.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let (raw, _) = self.pending.take()?;
        let value = String::from(raw.trim());
        if self.last_emitted.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
