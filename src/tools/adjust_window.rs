//! Adjust window tool: apply a delta to a wake window with a 30-minute floor.

use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};

const NAME: &str = "adjust_wake_window";

/// New wake window after an adjustment.
pub struct AdjustWindowTool;

impl Tool for AdjustWindowTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Calculate new wake window after adjustment (never below 30 minutes)."
                .into(),
            parameters: vec![
                ToolParam::required("current_window_minutes", "Current wake window in minutes."),
                ToolParam::required(
                    "adjustment_minutes",
                    "Minutes to adjust (negative to shorten, positive to extend).",
                ),
            ],
        }
    }

    fn execute(
        &self,
        planner: &Planner,
        session: &mut SessionState,
        input: ToolInput,
    ) -> ToolResult<ToolOutput> {
        let current = input.require_u32("current_window_minutes", NAME)?;
        let delta = input.require_i32("adjustment_minutes", NAME)?;

        let adjustment = planner.adjust_window(current, delta);
        session.record_adjustment(&adjustment);
        Ok(ToolOutput::ok(&adjustment))
    }
}
