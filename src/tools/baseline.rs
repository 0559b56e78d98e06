//! Baseline tool: age-appropriate reference wake windows.

use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};

const NAME: &str = "get_baseline_wake_windows";

/// Age-indexed baseline wake window, for context only.
pub struct BaselineTool;

impl Tool for BaselineTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Get age-appropriate baseline wake windows from the reference table."
                .into(),
            parameters: vec![ToolParam::required("age_months", "Child's age in months.")],
        }
    }

    fn execute(
        &self,
        planner: &Planner,
        session: &mut SessionState,
        input: ToolInput,
    ) -> ToolResult<ToolOutput> {
        let age_months = input.require_i32("age_months", NAME)?;

        match planner.baseline(age_months) {
            Ok(baseline) => {
                session.record_baseline(&baseline);
                Ok(ToolOutput::ok(&baseline))
            }
            Err(e) => Ok(ToolOutput::err(e.to_string()).with_field("age_months", age_months)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;

    #[test]
    fn looks_up_bucket() {
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        let mut session = SessionState::new();
        let input = ToolInput::new().with_param("age_months", 11);
        let out = BaselineTool.execute(&planner, &mut session, input).unwrap();
        assert_eq!(out.get("age_range").and_then(|v| v.as_str()), Some("10-12 months"));
        assert_eq!(out.get("average_minutes").unwrap(), 210);
        assert!(session.last_baseline.is_some());
    }

    #[test]
    fn negative_age_echoes_input() {
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        let mut session = SessionState::new();
        let input = ToolInput::new().with_param("age_months", -2);
        let out = BaselineTool.execute(&planner, &mut session, input).unwrap();
        assert!(!out.is_success());
        assert_eq!(out.get("age_months").unwrap(), -2);
    }
}
