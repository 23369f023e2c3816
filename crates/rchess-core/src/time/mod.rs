//! Clock and time allocation
//!
//! Times are kept in signed milliseconds: a clock that has run out keeps
//! counting down past zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Share of the remaining base time spent per move under increment play
const INCREMENT_BASE_DIVISOR: i64 = 20;

/// Time control of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClockFormat {
    /// `moves_per_session` moves in `base_ms`, repeating
    Tournament { moves_per_session: u32, base_ms: i64 },
    /// `base_ms` once, plus `increment_ms` after every move
    Increment { base_ms: i64, increment_ms: i64 },
}

impl ClockFormat {
    /// Time on the clock at the start of a game
    pub fn base_ms(&self) -> i64 {
        match *self {
            ClockFormat::Tournament { base_ms, .. } | ClockFormat::Increment { base_ms, .. } => base_ms,
        }
    }

    pub fn increment_ms(&self) -> i64 {
        match *self {
            ClockFormat::Tournament { .. } => 0,
            ClockFormat::Increment { increment_ms, .. } => increment_ms,
        }
    }
}

impl Default for ClockFormat {
    /// 40 moves in 20 minutes
    fn default() -> Self {
        ClockFormat::Tournament {
            moves_per_session: 40,
            base_ms: 20 * 60 * 1000,
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ClockFormat::Tournament {
                moves_per_session,
                base_ms,
            } => write!(f, "{} moves in {} seconds", moves_per_session, base_ms / 1000),
            ClockFormat::Increment { base_ms, increment_ms } => write!(
                f,
                "{} seconds initially, plus {} seconds per move",
                base_ms / 1000,
                increment_ms / 1000
            ),
        }
    }
}

/// Countdown clock for one side
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    set_at: Instant,
    amount_ms: i64,
}

impl Clock {
    pub fn new(amount_ms: i64) -> Self {
        Self {
            set_at: Instant::now(),
            amount_ms,
        }
    }

    /// Restart the countdown from `amount_ms`
    pub fn set(&mut self, amount_ms: i64) {
        self.set_at = Instant::now();
        self.amount_ms = amount_ms;
    }

    pub fn increment(&mut self, amount_ms: i64) {
        self.amount_ms += amount_ms;
    }

    /// Milliseconds remaining, negative once flagged
    pub fn left(&self) -> i64 {
        let elapsed = i64::try_from(self.set_at.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.amount_ms.saturating_sub(elapsed)
    }
}

/// Time to spend on the move numbered `move_number` (starting at 1)
///
/// Tournament play spreads the remaining time so the last move of the
/// session may use all of it. Increment play spends a twentieth of the
/// clock plus the increment, unless that would overrun the clock.
pub fn allocate_search_time(format: &ClockFormat, clock_left_ms: i64, move_number: u32) -> Duration {
    let ms = match *format {
        ClockFormat::Tournament {
            moves_per_session, ..
        } if moves_per_session > 0 => {
            let elapsed_moves = move_number.saturating_sub(1);
            let moves_left = i64::from(moves_per_session - elapsed_moves % moves_per_session);
            clock_left_ms.saturating_mul(2) / (moves_left + 1)
        }
        ClockFormat::Tournament { .. } => clock_left_ms / INCREMENT_BASE_DIVISOR,
        ClockFormat::Increment { increment_ms, .. } => {
            let from_base = clock_left_ms / INCREMENT_BASE_DIVISOR;
            let total = from_base + increment_ms;
            if total < clock_left_ms { total } else { from_base }
        }
    };
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}
