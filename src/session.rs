//! Caller-owned session state.
//!
//! Tool calls record their latest result here so a conversation can refer
//! back to "the last duration" or "today's schedule". The state is passed in
//! by `&mut` on every call and lives only as long as the caller keeps it; the
//! planner's pure operations never see it.

use serde::Serialize;

use crate::assess::AssessmentResult;
use crate::baseline::BaselineWindow;
use crate::clock::{NextSleep, SleepDuration};
use crate::schedule::{DailySchedule, WindowAdjustment};

/// Last result of each kind of calculation in one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub last_sleep_duration: Option<SleepDuration>,
    pub last_schedule_calculation: Option<NextSleep>,
    pub wake_window_adjustment: Option<WindowAdjustment>,
    pub daily_schedule: Option<DailySchedule>,
    pub last_assessment: Option<AssessmentResult>,
    pub last_baseline: Option<BaselineWindow>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_duration(&mut self, duration: &SleepDuration) {
        self.last_sleep_duration = Some(duration.clone());
    }

    pub fn record_next_sleep(&mut self, next: &NextSleep) {
        self.last_schedule_calculation = Some(next.clone());
    }

    pub fn record_adjustment(&mut self, adjustment: &WindowAdjustment) {
        self.wake_window_adjustment = Some(adjustment.clone());
    }

    pub fn record_schedule(&mut self, schedule: &DailySchedule) {
        self.daily_schedule = Some(schedule.clone());
    }

    pub fn record_assessment(&mut self, result: &AssessmentResult) {
        self.last_assessment = Some(result.clone());
    }

    pub fn record_baseline(&mut self, baseline: &BaselineWindow) {
        self.last_baseline = Some(baseline.clone());
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.last_sleep_duration.is_none()
            && self.last_schedule_calculation.is_none()
            && self.wake_window_adjustment.is_none()
            && self.daily_schedule.is_none()
            && self.last_assessment.is_none()
            && self.last_baseline.is_none()
    }

    /// JSON snapshot of everything recorded so far.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
