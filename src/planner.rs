//! Planner facade: top-level API for the wakewindow system.
//!
//! The `Planner` owns the ruleset, schedule settings and the baseline table,
//! and exposes the six operations plus the assess-then-adjust revision flow.
//! It holds no mutable state, so one planner can serve any number of callers
//! concurrently.

use serde::Serialize;

use crate::assess::{AssessmentRequest, AssessmentResult, Ruleset};
use crate::baseline::{BaselineTable, BaselineWindow};
use crate::clock::{self, NextSleep, SleepDuration};
use crate::config::PlannerConfig;
use crate::error::WakeResult;
use crate::schedule::{self, DailySchedule, ScheduleSettings, WindowAdjustment};

/// An assessment together with the window adjustment it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowRevision {
    pub assessment: AssessmentResult,
    pub adjustment: WindowAdjustment,
}

/// The wake window planner.
#[derive(Debug, Clone)]
pub struct Planner {
    rules: Ruleset,
    schedule: ScheduleSettings,
    baselines: &'static BaselineTable,
}

impl Planner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> WakeResult<Self> {
        config.validate()?;
        let baselines = BaselineTable::bundled()?;

        tracing::info!(
            step = config.rules.adjustment_step_minutes,
            slow_to_sleep = config.rules.slow_to_sleep_minutes,
            buckets = baselines.len(),
            "initializing wake window planner"
        );

        Ok(Self {
            rules: config.rules,
            schedule: config.schedule,
            baselines,
        })
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn schedule_settings(&self) -> &ScheduleSettings {
        &self.schedule
    }

    /// Classify one sleep period.
    pub fn assess(&self, request: &AssessmentRequest) -> AssessmentResult {
        self.rules.assess(request)
    }

    /// Minutes slept between two clock times.
    pub fn sleep_duration(&self, put_down: &str, wake_up: &str) -> WakeResult<SleepDuration> {
        Ok(clock::sleep_duration(put_down, wake_up)?)
    }

    /// When the next sleep should start.
    pub fn next_sleep_time(&self, wake_time: &str, window_minutes: u32) -> WakeResult<NextSleep> {
        Ok(clock::next_sleep_time(wake_time, window_minutes)?)
    }

    /// Apply a delta to a wake window, honouring the floor.
    pub fn adjust_window(&self, current_minutes: u32, delta_minutes: i32) -> WindowAdjustment {
        schedule::adjust_window(current_minutes, delta_minutes)
    }

    /// Lay out a full day.
    pub fn daily_schedule(
        &self,
        wake_time: &str,
        windows: &[u32],
        nap_count: usize,
    ) -> WakeResult<DailySchedule> {
        Ok(schedule::daily_schedule(
            wake_time,
            windows,
            nap_count,
            &self.schedule,
        )?)
    }

    /// Age-appropriate baseline wake window.
    pub fn baseline(&self, age_months: i32) -> WakeResult<BaselineWindow> {
        Ok(self.baselines.lookup(age_months)?)
    }

    /// Assess a sleep period and carry its adjustment into the window that
    /// preceded it. Unclassified observations are rejected rather than
    /// treated as "no change".
    pub fn revise_window(
        &self,
        current_minutes: u32,
        request: &AssessmentRequest,
    ) -> WakeResult<WindowRevision> {
        let assessment = self.assess(request);
        assessment.classified()?;
        let adjustment = self.adjust_window(current_minutes, assessment.adjustment_minutes);
        Ok(WindowRevision {
            assessment,
            adjustment,
        })
    }
}
