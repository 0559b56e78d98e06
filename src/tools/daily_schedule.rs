//! Daily schedule tool: lay out naps and bedtime from a list of wake windows.

use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};

const NAME: &str = "calculate_daily_schedule";

/// Full day schedule from a morning wake time and wake windows.
pub struct DailyScheduleTool;

impl Tool for DailyScheduleTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Calculate full day schedule based on wake windows.".into(),
            parameters: vec![
                ToolParam::required("wake_time", "Morning wake time (HH:MM)."),
                ToolParam::required(
                    "wake_windows",
                    "Wake windows in minutes for each period, in order.",
                ),
                ToolParam::required("nap_count", "Number of naps expected."),
            ],
        }
    }

    fn execute(
        &self,
        planner: &Planner,
        session: &mut SessionState,
        input: ToolInput,
    ) -> ToolResult<ToolOutput> {
        let wake_time = input.require_str("wake_time", NAME)?;
        let windows = input.require_u32_list("wake_windows", NAME)?;
        let nap_count = input.require_u32("nap_count", NAME)? as usize;

        match planner.daily_schedule(wake_time, &windows, nap_count) {
            Ok(schedule) => {
                session.record_schedule(&schedule);
                Ok(ToolOutput::ok(&schedule))
            }
            Err(e) => Ok(ToolOutput::err(e.to_string())),
        }
    }
}
