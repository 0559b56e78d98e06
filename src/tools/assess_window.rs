//! Assessment tool: run the wake window decision tree on reported behaviour.

use crate::assess::{AssessmentRequest, RawAssessment};
use crate::planner::Planner;
use crate::session::SessionState;
use crate::tool::{Tool, ToolInput, ToolOutput, ToolParam, ToolResult, ToolSignature};
use crate::vocab::{NightPattern, WakeMood};

const NAME: &str = "assess_wake_window_adjustment";

/// Classify a sleep period and recommend a wake window adjustment.
pub struct AssessWindowTool;

impl Tool for AssessWindowTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: NAME.into(),
            description: "Assess a wake window from sleep behaviour and determine the adjustment."
                .into(),
            parameters: vec![
                ToolParam::required("window_id", "Identifier for this window (e.g. \"nap1\", \"bedtime\")."),
                ToolParam::required("sleep_type", "\"independent\" or \"assisted\"."),
                ToolParam::required(
                    "putdown_behavior",
                    "\"cries_immediately\", \"plays_fusses_long\" or \"calm\".",
                ),
                ToolParam::required("time_to_sleep_minutes", "Minutes taken to fall asleep."),
                ToolParam::optional("is_bedtime", "Whether this is bedtime rather than a nap."),
                ToolParam::optional("wake_mood", "\"crying\", \"happy\" or \"neutral\" (default)."),
                ToolParam::optional("nap_duration_minutes", "Duration of the nap in minutes."),
                ToolParam::optional(
                    "night_pattern",
                    "\"frequent_wakings\", \"split_nights\" or \"normal\" (default).",
                ),
                ToolParam::optional(
                    "crying_before_offered",
                    "Assisted sleep only: was the baby crying before sleep was offered.",
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
        let window_id = input.require_str("window_id", NAME)?.to_string();
        let raw = RawAssessment {
            window_id: window_id.clone(),
            sleep_type: input.require_str("sleep_type", NAME)?.to_string(),
            putdown_behavior: input.require_str("putdown_behavior", NAME)?.to_string(),
            time_to_sleep_minutes: input.require_u32("time_to_sleep_minutes", NAME)?,
            is_bedtime: input.get_bool("is_bedtime", NAME)?.unwrap_or(false),
            wake_mood: input
                .get_str("wake_mood", NAME)?
                .unwrap_or(WakeMood::default().as_str())
                .to_string(),
            nap_duration_minutes: input.get_u32("nap_duration_minutes", NAME)?,
            night_pattern: input
                .get_str("night_pattern", NAME)?
                .unwrap_or(NightPattern::default().as_str())
                .to_string(),
            crying_before_offered: input
                .get_bool("crying_before_offered", NAME)?
                .unwrap_or(false),
        };

        let request = match AssessmentRequest::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                return Ok(ToolOutput::err(format!("Invalid input value: {e}"))
                    .with_field("window_id", window_id));
            }
        };

        let result = planner.assess(&request);
        session.record_assessment(&result);
        Ok(ToolOutput::ok(&result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::tool::ToolError;
    use serde_json::json;

    fn run(params: serde_json::Value) -> ToolResult<ToolOutput> {
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        let mut session = SessionState::new();
        AssessWindowTool.execute(&planner, &mut session, ToolInput::from_json(params).unwrap())
    }

    #[test]
    fn overtired_nap() {
        let out = run(json!({
            "window_id": "nap1",
            "sleep_type": "independent",
            "putdown_behavior": "cries_immediately",
            "time_to_sleep_minutes": 5,
        }))
        .unwrap();
        assert!(out.is_success());
        assert_eq!(out.get("assessment").and_then(|v| v.as_str()), Some("overtired"));
        assert_eq!(out.get("adjustment_minutes").unwrap(), -15);
        assert_eq!(out.get("action").and_then(|v| v.as_str()), Some("shorten"));
        assert_eq!(
            out.get("recommendation").and_then(|v| v.as_str()),
            Some("Shorten nap1 wake window by 15 minutes")
        );
        assert_eq!(out.get("details").unwrap()["putdown_behavior"], "cries_immediately");
    }

    #[test]
    fn invalid_enum_echoes_window_id() {
        let out = run(json!({
            "window_id": "nap2",
            "sleep_type": "nursed",
            "putdown_behavior": "calm",
            "time_to_sleep_minutes": 5,
        }))
        .unwrap();
        assert!(!out.is_success());
        assert_eq!(out.get("window_id").and_then(|v| v.as_str()), Some("nap2"));
        let msg = out.error().unwrap();
        assert!(msg.contains("sleep_type") && msg.contains("nursed"), "{msg}");
    }

    #[test]
    fn invalid_optional_enum_is_rejected_too() {
        let out = run(json!({
            "window_id": "bedtime",
            "sleep_type": "assisted",
            "putdown_behavior": "calm",
            "time_to_sleep_minutes": 5,
            "is_bedtime": true,
            "night_pattern": "restless",
        }))
        .unwrap();
        assert!(!out.is_success());
        assert!(out.error().unwrap().contains("night_pattern"));
    }

    #[test]
    fn missing_required_observation() {
        let err = run(json!({
            "window_id": "nap1",
            "sleep_type": "independent",
            "time_to_sleep_minutes": 5,
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::MissingParam { ref name, .. } if name == "putdown_behavior"));
    }

    #[test]
    fn unclear_is_reported_not_defaulted() {
        let out = run(json!({
            "window_id": "nap2",
            "sleep_type": "independent",
            "putdown_behavior": "calm",
            "time_to_sleep_minutes": 10,
            "nap_duration_minutes": 40,
            "wake_mood": "neutral",
        }))
        .unwrap();
        assert!(out.is_success());
        assert_eq!(out.get("assessment").and_then(|v| v.as_str()), Some("unclear"));
        assert_eq!(out.get("adjustment_minutes").unwrap(), 0);
    }

    #[test]
    fn accepts_loosely_typed_values() {
        let out = run(json!({
            "window_id": "bedtime",
            "sleep_type": "independent",
            "putdown_behavior": "calm",
            "time_to_sleep_minutes": "5",
            "is_bedtime": "true",
            "wake_mood": null,
            "nap_duration_minutes": null,
            "night_pattern": "split_nights",
            "crying_before_offered": "false",
        }))
        .unwrap();
        assert!(out.is_success(), "{:?}", out.error());
        assert_eq!(out.get("assessment").and_then(|v| v.as_str()), Some("undertired"));
        assert_eq!(out.get("adjustment_minutes").unwrap(), 15);
        assert_eq!(out.get("details").unwrap()["time_to_sleep"], 5);
        assert_eq!(out.get("details").unwrap()["is_bedtime"], true);
        assert_eq!(out.get("details").unwrap()["wake_mood"], "neutral");
    }

    #[test]
    fn bad_field_is_named() {
        let err = run(json!({
            "window_id": "nap1",
            "sleep_type": "independent",
            "putdown_behavior": "calm",
            "time_to_sleep_minutes": 5,
            "nap_duration_minutes": "long",
        }))
        .unwrap_err();
        assert!(
            matches!(err, ToolError::InvalidParam { ref name, .. } if name == "nap_duration_minutes")
        );
    }
}
