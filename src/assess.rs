//! Wake window assessment: the decision tree.
//!
//! Classifies a single sleep period as overtired, undertired, optimal or
//! unclear from caregiver observations, and emits a signed adjustment to the
//! wake window that preceded it. Rules are evaluated in strict priority order;
//! the thresholds live in [`Ruleset`], whose defaults are the baseline ruleset.
//!
//! Assisted sleep has one ordering quirk that is kept on purpose for
//! compatibility: at bedtime the night-pattern verdict is always superseded
//! by the time-to-sleep verdict evaluated after it. The superseded verdict is
//! traced at debug level so the discarded signal stays visible.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AssessError, VocabResult};
use crate::vocab::{NightPattern, PutDownBehavior, SleepType, WakeMood};

// ---------------------------------------------------------------------------
// Ruleset
// ---------------------------------------------------------------------------

/// Thresholds for the decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Magnitude of every non-zero adjustment.
    #[serde(default = "default_adjustment_step")]
    pub adjustment_step_minutes: u32,
    /// Falling asleep in more than this many minutes reads as undertired.
    #[serde(default = "default_slow_to_sleep")]
    pub slow_to_sleep_minutes: u32,
    /// Assisted sleep under this many minutes is a perfect window.
    #[serde(default = "default_quick_sleep")]
    pub quick_sleep_minutes: u32,
    /// Naps shorter than this are judged by wake mood.
    #[serde(default = "default_short_nap")]
    pub short_nap_minutes: u32,
}

fn default_adjustment_step() -> u32 {
    15
}
fn default_slow_to_sleep() -> u32 {
    20
}
fn default_quick_sleep() -> u32 {
    15
}
fn default_short_nap() -> u32 {
    60
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            adjustment_step_minutes: default_adjustment_step(),
            slow_to_sleep_minutes: default_slow_to_sleep(),
            quick_sleep_minutes: default_quick_sleep(),
            short_nap_minutes: default_short_nap(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One sleep period's observations, with every vocabulary already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRequest {
    pub window_id: String,
    pub sleep_type: SleepType,
    pub putdown_behavior: PutDownBehavior,
    pub time_to_sleep_minutes: u32,
    pub is_bedtime: bool,
    pub wake_mood: WakeMood,
    /// Only meaningful for naps.
    pub nap_duration_minutes: Option<u32>,
    /// Only meaningful at bedtime.
    pub night_pattern: NightPattern,
    /// Only meaningful for assisted sleep.
    pub crying_before_offered: bool,
}

impl AssessmentRequest {
    /// Start a request with the required observations; the rest take defaults.
    pub fn new(
        window_id: impl Into<String>,
        sleep_type: SleepType,
        putdown_behavior: PutDownBehavior,
        time_to_sleep_minutes: u32,
    ) -> Self {
        Self {
            window_id: window_id.into(),
            sleep_type,
            putdown_behavior,
            time_to_sleep_minutes,
            is_bedtime: false,
            wake_mood: WakeMood::default(),
            nap_duration_minutes: None,
            night_pattern: NightPattern::default(),
            crying_before_offered: false,
        }
    }

    pub fn bedtime(mut self, night_pattern: NightPattern) -> Self {
        self.is_bedtime = true;
        self.night_pattern = night_pattern;
        self
    }

    pub fn with_nap(mut self, nap_duration_minutes: u32, wake_mood: WakeMood) -> Self {
        self.nap_duration_minutes = Some(nap_duration_minutes);
        self.wake_mood = wake_mood;
        self
    }

    pub fn with_wake_mood(mut self, wake_mood: WakeMood) -> Self {
        self.wake_mood = wake_mood;
        self
    }

    pub fn with_crying_before_offered(mut self, crying: bool) -> Self {
        self.crying_before_offered = crying;
        self
    }

    /// Parse raw wire strings into a typed request.
    pub fn parse(raw: RawAssessment) -> VocabResult<Self> {
        Ok(Self {
            sleep_type: raw.sleep_type.parse()?,
            putdown_behavior: raw.putdown_behavior.parse()?,
            wake_mood: raw.wake_mood.parse()?,
            night_pattern: raw.night_pattern.parse()?,
            window_id: raw.window_id,
            time_to_sleep_minutes: raw.time_to_sleep_minutes,
            is_bedtime: raw.is_bedtime,
            nap_duration_minutes: raw.nap_duration_minutes,
            crying_before_offered: raw.crying_before_offered,
        })
    }
}

/// Observations as they arrive from a caller: vocabularies still as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAssessment {
    pub window_id: String,
    pub sleep_type: String,
    pub putdown_behavior: String,
    pub time_to_sleep_minutes: u32,
    #[serde(default)]
    pub is_bedtime: bool,
    #[serde(default = "default_wake_mood")]
    pub wake_mood: String,
    #[serde(default)]
    pub nap_duration_minutes: Option<u32>,
    #[serde(default = "default_night_pattern")]
    pub night_pattern: String,
    #[serde(default)]
    pub crying_before_offered: bool,
}

fn default_wake_mood() -> String {
    WakeMood::default().as_str().into()
}
fn default_night_pattern() -> String {
    NightPattern::default().as_str().into()
}

impl TryFrom<RawAssessment> for AssessmentRequest {
    type Error = crate::error::VocabError;

    fn try_from(raw: RawAssessment) -> VocabResult<Self> {
        Self::parse(raw)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Classification of the wake window that preceded a sleep period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Overtired,
    Undertired,
    Optimal,
    /// No rule matched the observations.
    Unclear,
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overtired => write!(f, "overtired"),
            Self::Undertired => write!(f, "undertired"),
            Self::Optimal => write!(f, "optimal"),
            Self::Unclear => write!(f, "unclear"),
        }
    }
}

/// What to do with the window, derived from the sign of the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Shorten,
    Extend,
    Maintain,
}

impl Action {
    pub fn from_adjustment(adjustment_minutes: i32) -> Self {
        match adjustment_minutes.signum() {
            -1 => Self::Shorten,
            1 => Self::Extend,
            _ => Self::Maintain,
        }
    }

    /// Capitalised verb used in recommendation text.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Shorten => "Shorten",
            Self::Extend => "Extend",
            Self::Maintain => "Maintain",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shorten => write!(f, "shorten"),
            Self::Extend => write!(f, "extend"),
            Self::Maintain => write!(f, "maintain"),
        }
    }
}

/// Echo of every observation that went into an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentDetails {
    pub sleep_type: SleepType,
    pub putdown_behavior: PutDownBehavior,
    pub time_to_sleep: u32,
    pub is_bedtime: bool,
    pub wake_mood: WakeMood,
    pub nap_duration: Option<u32>,
    pub night_pattern: NightPattern,
    pub crying_before_offered: bool,
}

impl From<&AssessmentRequest> for AssessmentDetails {
    fn from(req: &AssessmentRequest) -> Self {
        Self {
            sleep_type: req.sleep_type,
            putdown_behavior: req.putdown_behavior,
            time_to_sleep: req.time_to_sleep_minutes,
            is_bedtime: req.is_bedtime,
            wake_mood: req.wake_mood,
            nap_duration: req.nap_duration_minutes,
            night_pattern: req.night_pattern,
            crying_before_offered: req.crying_before_offered,
        }
    }
}

/// Outcome of one assessment. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentResult {
    pub window_id: String,
    pub assessment: Assessment,
    pub adjustment_minutes: i32,
    pub reason: String,
    pub action: Action,
    pub recommendation: String,
    pub details: AssessmentDetails,
}

impl AssessmentResult {
    /// The result itself, or [`AssessError::Unclassified`] when no rule matched.
    pub fn classified(&self) -> Result<&Self, AssessError> {
        if self.assessment == Assessment::Unclear {
            Err(AssessError::Unclassified {
                window_id: self.window_id.clone(),
            })
        } else {
            Ok(self)
        }
    }
}

// ---------------------------------------------------------------------------
// Decision tree
// ---------------------------------------------------------------------------

struct Verdict {
    assessment: Assessment,
    adjustment_minutes: i32,
    reason: String,
}

impl Ruleset {
    /// Run the decision tree over one request.
    pub fn assess(&self, req: &AssessmentRequest) -> AssessmentResult {
        let verdict = match req.sleep_type {
            SleepType::Independent => self.independent(req),
            SleepType::Assisted => self.assisted(req),
        };

        let action = Action::from_adjustment(verdict.adjustment_minutes);
        tracing::debug!(
            window_id = %req.window_id,
            assessment = %verdict.assessment,
            adjustment = verdict.adjustment_minutes,
            "assessed wake window"
        );

        AssessmentResult {
            window_id: req.window_id.clone(),
            assessment: verdict.assessment,
            adjustment_minutes: verdict.adjustment_minutes,
            reason: format!("{}: {}", req.window_id, verdict.reason),
            action,
            recommendation: format!(
                "{} {} wake window by {} minutes",
                action.verb(),
                req.window_id,
                verdict.adjustment_minutes.unsigned_abs()
            ),
            details: AssessmentDetails::from(req),
        }
    }

    fn independent(&self, req: &AssessmentRequest) -> Verdict {
        if req.putdown_behavior == PutDownBehavior::CriesImmediately {
            return self.overtired("crying immediately = overtired");
        }
        if req.putdown_behavior == PutDownBehavior::PlaysFussesLong
            || req.time_to_sleep_minutes > self.slow_to_sleep_minutes
        {
            return self.undertired("playing/slow to sleep = undertired");
        }

        // Calm, and asleep within the threshold.
        let calm = format!("fell asleep calmly <{}min", self.slow_to_sleep_minutes);
        if req.is_bedtime {
            return match req.night_pattern {
                NightPattern::FrequentWakings => {
                    self.overtired("frequent night wakings + crying = overtired")
                }
                NightPattern::SplitNights => {
                    self.undertired("split nights (happy wake) = undertired")
                }
                NightPattern::Normal => self.optimal(calm),
            };
        }

        match req.nap_duration_minutes {
            Some(nap) if nap < self.short_nap_minutes => match req.wake_mood {
                WakeMood::Crying => self.overtired("short nap + crying = overtired"),
                WakeMood::Happy => self.undertired("short nap + happy = undertired"),
                WakeMood::Neutral => Self::unclear(),
            },
            Some(_) => self.optimal(format!(
                "{}+ min nap = optimal timing",
                self.short_nap_minutes
            )),
            None => self.optimal(calm),
        }
    }

    fn assisted(&self, req: &AssessmentRequest) -> Verdict {
        if req.crying_before_offered {
            return self.overtired("crying before offered = overtired");
        }

        let night = if req.is_bedtime {
            match req.night_pattern {
                NightPattern::FrequentWakings => {
                    Some(self.overtired("frequent night wakings = overtired"))
                }
                NightPattern::SplitNights => Some(self.undertired("split nights = undertired")),
                NightPattern::Normal => None,
            }
        } else {
            None
        };

        let timing = if req.time_to_sleep_minutes < self.quick_sleep_minutes {
            self.optimal("calm + quick sleep = perfect window")
        } else if req.time_to_sleep_minutes > self.slow_to_sleep_minutes {
            self.undertired("calm but slow sleep = undertired")
        } else {
            self.optimal("calm + reasonable time = good window")
        };

        // Time to sleep always has the last word for assisted sleep.
        if let Some(night) = night {
            if night.assessment != timing.assessment {
                tracing::debug!(
                    window_id = %req.window_id,
                    night_pattern = %req.night_pattern,
                    superseded = %night.assessment,
                    kept = %timing.assessment,
                    "night pattern verdict superseded by time to sleep"
                );
            }
        }
        timing
    }

    fn step(&self) -> i32 {
        i32::try_from(self.adjustment_step_minutes).unwrap_or(i32::MAX)
    }

    fn overtired(&self, reason: impl Into<String>) -> Verdict {
        Verdict {
            assessment: Assessment::Overtired,
            adjustment_minutes: -self.step(),
            reason: reason.into(),
        }
    }

    fn undertired(&self, reason: impl Into<String>) -> Verdict {
        Verdict {
            assessment: Assessment::Undertired,
            adjustment_minutes: self.step(),
            reason: reason.into(),
        }
    }

    fn optimal(&self, reason: impl Into<String>) -> Verdict {
        Verdict {
            assessment: Assessment::Optimal,
            adjustment_minutes: 0,
            reason: reason.into(),
        }
    }

    fn unclear() -> Verdict {
        Verdict {
            assessment: Assessment::Unclear,
            adjustment_minutes: 0,
            reason: "incomplete data".into(),
        }
    }
}

/// Assess with the baseline ruleset.
pub fn assess(request: &AssessmentRequest) -> AssessmentResult {
    Ruleset::default().assess(request)
}
