//! Rich diagnostic error types for the wakewindow planner.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know which input to correct.
//! Nothing here is retried: every operation is pure, so a caller that receives
//! an error simply re-invokes with corrected inputs.

use miette::Diagnostic;
use thiserror::Error;

use crate::baseline::BaselineError;
use crate::config::ConfigError;
use crate::tool::ToolError;

/// Top-level error type for the planner.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum WakeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocab(#[from] VocabError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Assess(#[from] AssessError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Baseline(#[from] BaselineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tool(#[from] ToolError),
}

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabError {
    #[error("invalid value for {field}: \"{value}\" (expected one of: {expected})")]
    #[diagnostic(
        code(wakewindow::vocab::invalid_enum_value),
        help(
            "Observations use closed vocabularies. Pass one of the listed values \
             exactly, in snake_case."
        )
    )]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Clock errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClockError {
    #[error("invalid time format: \"{input}\"")]
    #[diagnostic(
        code(wakewindow::clock::invalid_time_format),
        help("Use HH:MM in 24-hour format, e.g. \"07:00\" or \"19:30\".")
    )]
    InvalidTimeFormat { input: String },
}

// ---------------------------------------------------------------------------
// Assessment errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AssessError {
    #[error("window \"{window_id}\" could not be classified")]
    #[diagnostic(
        code(wakewindow::assess::unclassified),
        help(
            "A short nap with a neutral wake mood matches no rule. Report the wake \
             mood as crying or happy, or collect another day of observations."
        )
    )]
    Unclassified { window_id: String },
}

/// Convenience result alias for the planner.
pub type WakeResult<T> = std::result::Result<T, WakeError>;

pub type VocabResult<T> = std::result::Result<T, VocabError>;

pub type ClockResult<T> = std::result::Result<T, ClockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_enum_value_names_field_and_value() {
        let err = VocabError::InvalidEnumValue {
            field: "sleep_type",
            value: "nursed".into(),
            expected: "independent, assisted",
        };
        let msg = err.to_string();
        assert!(msg.contains("sleep_type"));
        assert!(msg.contains("nursed"));
    }

    #[test]
    fn wake_error_is_transparent() {
        let err: WakeError = ClockError::InvalidTimeFormat {
            input: "25:99".into(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid time format: \"25:99\"");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(
            code.as_deref(),
            Some("wakewindow::clock::invalid_time_format")
        );
    }
}
