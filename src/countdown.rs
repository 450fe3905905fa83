//! Countdown arithmetic for a running session.
//!
//! Time enters the game as a monotonically increasing millisecond counter supplied by the caller.
//! Nothing here reads the system clock, which keeps every computation a pure function of its
//! arguments.

/// Seconds a session lasts before it is lost.
pub const TIME_BUDGET_SECS: u64 = 60;

/// Milliseconds in one second.
const MILLIS_PER_SEC: u64 = 1_000;

/// Returns the whole seconds left on a countdown of `budget_secs` started at `start_ms`.
///
/// The result is `budget_secs - floor((now_ms - start_ms) / 1000)` and is deliberately left
/// unclamped: a value of zero or below means time is up. A `now_ms` earlier than `start_ms` counts
/// as no time elapsed.
pub fn remaining(now_ms: u64, start_ms: u64, budget_secs: u64) -> i64 {
    let elapsed_secs = now_ms.saturating_sub(start_ms) / MILLIS_PER_SEC;
    let budget = i64::try_from(budget_secs).unwrap_or(i64::MAX);
    let elapsed = i64::try_from(elapsed_secs).unwrap_or(i64::MAX);

    budget.saturating_sub(elapsed)
}

/// Countdown captured at the start of a session.
///
/// The only state is the start timestamp and the budget; everything else is derived from the
/// timestamp passed in on each query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameClock {
    /// Timestamp in milliseconds at which the session started.
    start_ms: u64,
    /// Length of the countdown in seconds.
    budget_secs: u64,
}

impl GameClock {
    /// Starts a countdown of `budget_secs` seconds at `start_ms`.
    pub const fn start(start_ms: u64, budget_secs: u64) -> Self {
        Self {
            start_ms,
            budget_secs,
        }
    }

    /// Unclamped seconds left at `now_ms`. See [`remaining`].
    pub fn remaining(&self, now_ms: u64) -> i64 {
        remaining(now_ms, self.start_ms, self.budget_secs)
    }
}

/// Clamps a countdown value to the non-negative seconds shown to the player.
pub fn display_seconds(remaining: i64) -> u64 {
    u64::try_from(remaining).unwrap_or(0)
}
