use std::fmt;

/// Moves strictly above this percentage trigger the news + mail path.
pub const BREACH_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "🔺",
            Direction::Down => "🔻",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Day-over-day move between the two most recent closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeResult {
    pub delta: f64,
    pub abs_delta: f64,
    pub pct: f64,
    pub direction: Direction,
}

impl ChangeResult {
    /// `latest` is yesterday's close, `previous` the day before.
    /// Returns `None` when `previous` is zero or not finite.
    pub fn between(latest: f64, previous: f64) -> Option<Self> {
        if previous == 0.0 || !previous.is_finite() || !latest.is_finite() {
            return None;
        }

        let delta = latest - previous;
        let abs_delta = delta.abs();
        let pct = abs_delta / previous * 100.0;
        // A flat day is reported as down.
        let direction = if delta > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        Some(Self {
            delta,
            abs_delta,
            pct,
            direction,
        })
    }

    pub fn is_breach(&self) -> bool {
        self.pct > BREACH_THRESHOLD_PCT
    }

    /// Whole-number percentage used in the mail subject and body (ties to even).
    pub fn rounded_pct(&self) -> i64 {
        self.pct.round_ties_even() as i64
    }
}
