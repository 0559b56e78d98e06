//! Schedule arithmetic: window adjustment and full-day composition.
//!
//! Consumes plain minutes and clock values only; nothing here knows about
//! assessments.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::clock::{ClockTime, format_minutes};
use crate::error::ClockResult;

/// No adjusted wake window may drop below this many minutes.
pub const MIN_WAKE_WINDOW_MINUTES: u32 = 30;

/// Assumed nap lengths used when laying out a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Assumed length of the first nap of the day.
    #[serde(default = "default_first_nap")]
    pub first_nap_minutes: u32,
    /// Assumed length of every later nap.
    #[serde(default = "default_later_nap")]
    pub later_nap_minutes: u32,
}

fn default_first_nap() -> u32 {
    90
}
fn default_later_nap() -> u32 {
    60
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            first_nap_minutes: default_first_nap(),
            later_nap_minutes: default_later_nap(),
        }
    }
}

impl ScheduleSettings {
    /// Assumed duration of the nap at zero-based `index`.
    pub fn nap_minutes(&self, index: usize) -> u32 {
        if index == 0 {
            self.first_nap_minutes
        } else {
            self.later_nap_minutes
        }
    }
}

// ---------------------------------------------------------------------------
// Window adjustment
// ---------------------------------------------------------------------------

/// Direction word reported for an adjustment, chosen from the sign of the
/// requested delta rather than the change actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdjustDirection {
    Extended,
    Shortened,
}

impl fmt::Display for AdjustDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extended => write!(f, "Extended"),
            Self::Shortened => write!(f, "Shortened"),
        }
    }
}

/// A wake window before and after an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowAdjustment {
    pub original_minutes: u32,
    pub adjustment_minutes: i32,
    pub new_minutes: u32,
    pub original_formatted: String,
    pub new_formatted: String,
    pub action: AdjustDirection,
    pub calculation: String,
}

/// Apply `delta_minutes` to a window, clamping the result at
/// [`MIN_WAKE_WINDOW_MINUTES`].
pub fn adjust_window(current_minutes: u32, delta_minutes: i32) -> WindowAdjustment {
    let raw = i64::from(current_minutes) + i64::from(delta_minutes);
    let new_minutes = raw.clamp(i64::from(MIN_WAKE_WINDOW_MINUTES), i64::from(u32::MAX)) as u32;
    if raw < i64::from(MIN_WAKE_WINDOW_MINUTES) {
        tracing::debug!(current_minutes, delta_minutes, "adjusted window clamped to floor");
    }

    let action = if delta_minutes > 0 {
        AdjustDirection::Extended
    } else {
        AdjustDirection::Shortened
    };
    let original_formatted = format_minutes(current_minutes);
    let new_formatted = format_minutes(new_minutes);

    WindowAdjustment {
        calculation: format!(
            "{action} {original_formatted} by {}min = {new_formatted}",
            delta_minutes.unsigned_abs()
        ),
        original_minutes: current_minutes,
        adjustment_minutes: delta_minutes,
        new_minutes,
        original_formatted,
        new_formatted,
        action,
    }
}

// ---------------------------------------------------------------------------
// Daily schedule
// ---------------------------------------------------------------------------

/// What happens at a schedule entry. Nap numbers are one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEventKind {
    MorningWake,
    Nap(usize),
    WakeFromNap(usize),
    Bedtime,
}

impl fmt::Display for ScheduleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MorningWake => write!(f, "Morning Wake"),
            Self::Nap(n) => write!(f, "Nap {n}"),
            Self::WakeFromNap(n) => write!(f, "Wake from Nap {n}"),
            Self::Bedtime => write!(f, "Bedtime"),
        }
    }
}

impl Serialize for ScheduleEventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One entry of a day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEvent {
    pub event: ScheduleEventKind,
    pub time: ClockTime,
    /// Wake window that led into a nap or bedtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_window_minutes: Option<u32>,
    /// Assumed length of the nap just ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl ScheduleEvent {
    fn at(event: ScheduleEventKind, time: ClockTime) -> Self {
        Self {
            event,
            time,
            wake_window_minutes: None,
            duration_minutes: None,
        }
    }
}

/// A full day, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySchedule {
    pub events: Vec<ScheduleEvent>,
    pub total_events: usize,
}

impl DailySchedule {
    /// The bedtime entry, if the windows reached one.
    pub fn bedtime(&self) -> Option<&ScheduleEvent> {
        self.events
            .iter()
            .find(|e| e.event == ScheduleEventKind::Bedtime)
    }
}

/// Lay out a day from a morning wake time and a sequence of wake windows.
///
/// The first `nap_count` windows each lead to a nap of assumed length; the
/// next window leads to bedtime, and any windows after it are ignored.
pub fn daily_schedule(
    wake_time: &str,
    windows: &[u32],
    nap_count: usize,
    settings: &ScheduleSettings,
) -> ClockResult<DailySchedule> {
    let wake = ClockTime::parse(wake_time)?;
    let mut events = vec![ScheduleEvent::at(ScheduleEventKind::MorningWake, wake)];
    let mut current = wake;

    for (i, &window) in windows.iter().enumerate() {
        let sleep_at = current.add_minutes(window);

        if i < nap_count {
            let nap_minutes = settings.nap_minutes(i);
            let woke_at = sleep_at.add_minutes(nap_minutes);
            events.push(ScheduleEvent {
                wake_window_minutes: Some(window),
                ..ScheduleEvent::at(ScheduleEventKind::Nap(i + 1), sleep_at)
            });
            events.push(ScheduleEvent {
                duration_minutes: Some(nap_minutes),
                ..ScheduleEvent::at(ScheduleEventKind::WakeFromNap(i + 1), woke_at)
            });
            current = woke_at;
        } else {
            events.push(ScheduleEvent {
                wake_window_minutes: Some(window),
                ..ScheduleEvent::at(ScheduleEventKind::Bedtime, sleep_at)
            });
            break;
        }
    }

    tracing::debug!(%wake, windows = windows.len(), nap_count, events = events.len(), "composed daily schedule");
    Ok(DailySchedule {
        total_events: events.len(),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_shortens() {
        let adj = adjust_window(100, -15);
        assert_eq!(adj.new_minutes, 85);
        assert_eq!(adj.action, AdjustDirection::Shortened);
        assert_eq!(adj.calculation, "Shortened 1h 40min by 15min = 1h 25min");
    }

    #[test]
    fn adjust_extends() {
        let adj = adjust_window(150, 15);
        assert_eq!(adj.new_minutes, 165);
        assert_eq!(adj.original_formatted, "2h 30min");
        assert_eq!(adj.new_formatted, "2h 45min");
        assert_eq!(adj.action, AdjustDirection::Extended);
    }

    #[test]
    fn adjust_clamps_at_floor() {
        let adj = adjust_window(40, -20);
        assert_eq!(adj.new_minutes, 30);
        assert_eq!(adj.action, AdjustDirection::Shortened);
        assert_eq!(adj.calculation, "Shortened 40min by 20min = 30min");
    }

    #[test]
    fn adjust_never_below_floor() {
        for current in [0, 10, 30, 31, 45, 300] {
            for delta in [-1000, -45, -15, -1, 0, 15] {
                assert!(adjust_window(current, delta).new_minutes >= MIN_WAKE_WINDOW_MINUTES);
            }
        }
        assert_eq!(adjust_window(0, i32::MIN).new_minutes, 30);
    }

    #[test]
    fn zero_delta_reports_shortened() {
        let adj = adjust_window(120, 0);
        assert_eq!(adj.new_minutes, 120);
        assert_eq!(adj.action, AdjustDirection::Shortened);
    }

    #[test]
    fn clamp_keeps_direction_of_delta() {
        // Below the floor already: a positive delta still reads as Extended.
        let adj = adjust_window(10, 5);
        assert_eq!(adj.new_minutes, 30);
        assert_eq!(adj.action, AdjustDirection::Extended);
    }

    #[test]
    fn two_nap_day() {
        let day = daily_schedule("07:00", &[150, 180, 210], 2, &ScheduleSettings::default())
            .unwrap();
        let got: Vec<(String, String)> = day
            .events
            .iter()
            .map(|e| (e.event.to_string(), e.time.to_string()))
            .collect();
        let expected = [
            ("Morning Wake", "07:00"),
            ("Nap 1", "09:30"),
            ("Wake from Nap 1", "11:00"),
            ("Nap 2", "14:00"),
            ("Wake from Nap 2", "15:00"),
            ("Bedtime", "18:30"),
        ];
        assert_eq!(got.len(), expected.len());
        for ((event, time), (want_event, want_time)) in got.iter().zip(expected) {
            assert_eq!(event, want_event);
            assert_eq!(time, want_time);
        }
        assert_eq!(day.total_events, 6);
        assert_eq!(day.events[1].wake_window_minutes, Some(150));
        assert_eq!(day.events[2].duration_minutes, Some(90));
        assert_eq!(day.events[4].duration_minutes, Some(60));
        assert_eq!(day.bedtime().unwrap().wake_window_minutes, Some(210));
    }

    #[test]
    fn stops_at_first_bedtime() {
        let day = daily_schedule("06:30", &[120, 240, 60, 60], 1, &ScheduleSettings::default())
            .unwrap();
        assert_eq!(day.total_events, 4);
        assert_eq!(day.events.last().unwrap().event, ScheduleEventKind::Bedtime);
        assert_eq!(day.events.last().unwrap().time.to_string(), "14:00");
    }

    #[test]
    fn no_naps_goes_straight_to_bedtime() {
        let day = daily_schedule("07:00", &[720], 0, &ScheduleSettings::default()).unwrap();
        assert_eq!(day.total_events, 2);
        assert_eq!(day.bedtime().unwrap().time.to_string(), "19:00");
    }

    #[test]
    fn windows_exhausted_before_bedtime() {
        let day = daily_schedule("07:00", &[120], 3, &ScheduleSettings::default()).unwrap();
        assert_eq!(day.total_events, 3);
        assert!(day.bedtime().is_none());
    }

    #[test]
    fn custom_nap_lengths() {
        let settings = ScheduleSettings {
            first_nap_minutes: 120,
            later_nap_minutes: 45,
        };
        let day = daily_schedule("07:00", &[120, 150, 240], 2, &settings).unwrap();
        assert_eq!(day.events[2].time.to_string(), "11:00");
        assert_eq!(day.events[4].time.to_string(), "14:15");
    }

    #[test]
    fn malformed_wake_time() {
        assert!(daily_schedule("7am", &[120], 0, &ScheduleSettings::default()).is_err());
    }

    #[test]
    fn events_serialize_with_labels() {
        let day = daily_schedule("07:00", &[150, 210], 1, &ScheduleSettings::default()).unwrap();
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["events"][0]["event"], "Morning Wake");
        assert_eq!(json["events"][0]["time"], "07:00");
        assert!(json["events"][0].get("wake_window_minutes").is_none());
        assert_eq!(json["events"][1]["event"], "Nap 1");
        assert_eq!(json["events"][1]["wake_window_minutes"], 150);
        assert_eq!(json["events"][2]["duration_minutes"], 90);
        assert_eq!(json["total_events"], 4);
    }
}
