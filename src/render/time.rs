//! Poll countdown formatting

use chrono::{DateTime, Utc};

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Label for a poll that has closed
pub const FINAL_RESULTS: &str = "Final results";

/// Whole-unit decomposition of the time left until a target.
///
/// Components are not clamped: a target in the past yields negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    /// Decompose `target - now` using floored division on each unit.
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = (target - now).num_milliseconds();
        Self {
            days: diff.div_euclid(DAY_MS),
            hours: (diff % DAY_MS).div_euclid(HOUR_MS),
            minutes: (diff % HOUR_MS).div_euclid(MINUTE_MS),
            seconds: (diff % MINUTE_MS).div_euclid(SECOND_MS),
        }
    }

    /// The largest positive unit, pluralized, or `"Final results"`.
    pub fn label(&self) -> String {
        [
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
        .into_iter()
        .find(|(value, _)| *value > 0)
        .map(|(value, unit)| {
            if value == 1 {
                format!("1 {unit} left")
            } else {
                format!("{value} {unit}s left")
            }
        })
        .unwrap_or_else(|| FINAL_RESULTS.to_string())
    }
}

/// Time left until `target`, measured from the current instant.
pub fn time_remaining(target: DateTime<Utc>) -> TimeRemaining {
    TimeRemaining::between(target, Utc::now())
}

/// Countdown label for `target`, measured from the current instant.
pub fn time_remaining_label(target: DateTime<Utc>) -> String {
    time_remaining(target).label()
}
