//! Sleep duration tool: minutes slept between put-down and wake-up.

use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};

const NAME: &str = "calculate_sleep_duration";

/// Exact duration between a put-down and a wake-up, rolling over midnight.
pub struct SleepDurationTool;

impl Tool for SleepDurationTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Calculate exact duration between put down and wake up times.".into(),
            parameters: vec![
                ToolParam::required("put_down_time", "Time baby was put down (HH:MM, 24-hour)."),
                ToolParam::required("wake_up_time", "Time baby woke up (HH:MM, 24-hour)."),
            ],
        }
    }

    fn execute(
        &self,
        planner: &Planner,
        session: &mut SessionState,
        input: ToolInput,
    ) -> ToolResult<ToolOutput> {
        let put_down = input.require_str("put_down_time", NAME)?;
        let wake_up = input.require_str("wake_up_time", NAME)?;

        match planner.sleep_duration(put_down, wake_up) {
            Ok(duration) => {
                session.record_duration(&duration);
                Ok(ToolOutput::ok(&duration))
            }
            Err(e) => Ok(ToolOutput::err(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;

    #[test]
    fn overnight_and_session() {
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        let mut session = SessionState::new();
        let input = ToolInput::new()
            .with_param("put_down_time", "22:30")
            .with_param("wake_up_time", "06:00");
        let out = SleepDurationTool.execute(&planner, &mut session, input).unwrap();
        assert!(out.is_success());
        assert_eq!(out.get("duration_minutes").unwrap(), 450);
        assert_eq!(out.get("formatted").and_then(|v| v.as_str()), Some("7h 30min"));
        assert_eq!(session.last_sleep_duration.unwrap().duration_minutes, 450);
    }

    #[test]
    fn bad_time_is_an_error_envelope() {
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        let mut session = SessionState::new();
        let input = ToolInput::new()
            .with_param("put_down_time", "10pm")
            .with_param("wake_up_time", "06:00");
        let out = SleepDurationTool.execute(&planner, &mut session, input).unwrap();
        assert!(!out.is_success());
        assert!(out.error().unwrap().contains("invalid time format"));
        assert!(session.is_empty());
    }
}
