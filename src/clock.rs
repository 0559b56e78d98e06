//! Clock arithmetic: HH:MM wall-clock values and minute durations.
//!
//! All wall-clock values are 24-hour times of day with no date attached.
//! A duration between two clock times rolls over midnight at most once; a
//! projection forward wraps past midnight implicitly.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, ClockResult};

const CLOCK_FORMAT: &str = "%H:%M";
const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse an `HH:MM` 24-hour string.
    pub fn parse(input: &str) -> ClockResult<Self> {
        NaiveTime::parse_from_str(input, CLOCK_FORMAT)
            .map(Self)
            .map_err(|_| ClockError::InvalidTimeFormat {
                input: input.to_string(),
            })
    }

    /// Build from hour and minute, if both are in range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Advance by `minutes`, wrapping past midnight as many times as needed.
    pub fn add_minutes(self, minutes: u32) -> Self {
        let (time, _wrapped_secs) = self
            .0
            .overflowing_add_signed(TimeDelta::minutes(i64::from(minutes)));
        Self(time)
    }

    /// Minutes from `self` forward to `later`, taking `later` on the next day
    /// when it falls before `self`. Equal times yield zero.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        let mut delta = later.0.signed_duration_since(self.0).num_minutes();
        if delta < 0 {
            delta += MINUTES_PER_DAY;
        }
        delta as u32
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> ClockResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockError;

    fn try_from(value: String) -> ClockResult<Self> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CLOCK_FORMAT))
    }
}

/// Render minutes as `"{h}h {m}min"`, or `"{m}min"` when under an hour.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest}min")
    } else {
        format!("{rest}min")
    }
}

/// Elapsed sleep between a put-down and a wake-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepDuration {
    pub put_down: ClockTime,
    pub wake_up: ClockTime,
    pub duration_minutes: u32,
    pub formatted: String,
    pub calculation: String,
}

/// Projected start of the next sleep period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextSleep {
    pub wake_time: ClockTime,
    pub wake_window_minutes: u32,
    pub next_sleep_time: ClockTime,
    pub wake_window_formatted: String,
    pub calculation: String,
}

/// Duration between two clock strings, rolling `wake_up` to the next day when
/// it is earlier than `put_down`.
pub fn sleep_duration(put_down: &str, wake_up: &str) -> ClockResult<SleepDuration> {
    let put_down = ClockTime::parse(put_down)?;
    let wake_up = ClockTime::parse(wake_up)?;

    let duration_minutes = put_down.minutes_until(wake_up);
    let formatted = format_minutes(duration_minutes);
    tracing::debug!(%put_down, %wake_up, duration_minutes, "computed sleep duration");

    Ok(SleepDuration {
        calculation: format!("Sleep from {put_down} to {wake_up} = {formatted}"),
        put_down,
        wake_up,
        duration_minutes,
        formatted,
    })
}

/// Time the next sleep should start: `wake_time + window_minutes`.
pub fn next_sleep_time(wake_time: &str, window_minutes: u32) -> ClockResult<NextSleep> {
    let wake_time = ClockTime::parse(wake_time)?;
    let next_sleep_time = wake_time.add_minutes(window_minutes);
    let wake_window_formatted = format_minutes(window_minutes);
    tracing::debug!(%wake_time, window_minutes, %next_sleep_time, "projected next sleep");

    Ok(NextSleep {
        calculation: format!(
            "Wake at {wake_time} + {wake_window_formatted} = Sleep at {next_sleep_time}"
        ),
        wake_time,
        wake_window_minutes: window_minutes,
        next_sleep_time,
        wake_window_formatted,
    })
}
