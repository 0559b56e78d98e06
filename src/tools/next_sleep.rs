//! Next sleep tool: project the next sleep time from a wake time and window.

use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};

const NAME: &str = "calculate_next_sleep_time";

/// When the next sleep should start, given a wake time and a wake window.
pub struct NextSleepTool;

impl Tool for NextSleepTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Calculate when next sleep time should be based on wake window.".into(),
            parameters: vec![
                ToolParam::required("wake_time", "Time baby woke up (HH:MM)."),
                ToolParam::required("wake_window_minutes", "Length of wake window in minutes."),
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
        let window = input.require_u32("wake_window_minutes", NAME)?;

        match planner.next_sleep_time(wake_time, window) {
            Ok(next) => {
                session.record_next_sleep(&next);
                Ok(ToolOutput::ok(&next))
            }
            Err(e) => Ok(ToolOutput::err(e.to_string())),
        }
    }
}
