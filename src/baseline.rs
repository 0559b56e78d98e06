//! Age-indexed baseline wake windows.
//!
//! The reference table is bundled into the binary as TOML, parsed once on
//! first use, and shared read-only afterwards. Baselines are context for a
//! caregiver, never the basis of an adjustment.

use std::sync::OnceLock;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, Diagnostic)]
pub enum BaselineError {
    #[error("invalid age: {age_months} months")]
    #[diagnostic(
        code(wakewindow::baseline::invalid_age),
        help("Age is given in whole months and cannot be negative.")
    )]
    InvalidAge { age_months: i32 },

    #[error("no wake window data found for {age_months} months (bucket \"{age_range}\")")]
    #[diagnostic(
        code(wakewindow::baseline::not_found),
        help("The baseline table has no entry for this age bucket. Check the bundled table.")
    )]
    NotFound { age_months: i32, age_range: String },

    #[error("malformed wake window range for \"{age_range}\": \"{range}\"")]
    #[diagnostic(
        code(wakewindow::baseline::malformed_range),
        help("Ranges are written as \"MIN-MAX minutes\" or \"N minutes\".")
    )]
    MalformedRange { age_range: String, range: String },

    #[error("failed to parse baseline table: {message}")]
    #[diagnostic(
        code(wakewindow::baseline::parse),
        help("Check the TOML syntax of the baseline table.")
    )]
    Parse { message: String },
}

pub type BaselineResult<T> = std::result::Result<T, BaselineError>;

// ── Data model ──────────────────────────────────────────────────────────

/// Baseline for one age, in the shape callers rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineWindow {
    pub age_months: i32,
    pub age_range: String,
    pub wake_window_range: String,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub average_minutes: u32,
    pub nap_count: String,
    pub source: String,
}

#[derive(Debug, Clone)]
struct Bucket {
    age_range: String,
    wake_window: String,
    naps: String,
    min_minutes: u32,
    max_minutes: u32,
}

/// Immutable age-bucket table.
#[derive(Debug, Clone)]
pub struct BaselineTable {
    source: String,
    buckets: Vec<Bucket>,
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TableToml {
    table: TableMeta,
    #[serde(default)]
    bucket: Vec<BucketToml>,
}

#[derive(Debug, Deserialize)]
struct TableMeta {
    source: String,
}

#[derive(Debug, Deserialize)]
struct BucketToml {
    age_range: String,
    wake_window: String,
    naps: String,
}

const BUNDLED_TOML: &str = include_str!("../data/baselines/wake_windows.toml");

static BUNDLED: OnceLock<Result<BaselineTable, String>> = OnceLock::new();

/// Parse `"MIN-MAX minutes"` or `"N minutes"` into `(min, max)`.
fn parse_range(age_range: &str, range: &str) -> BaselineResult<(u32, u32)> {
    let malformed = || BaselineError::MalformedRange {
        age_range: age_range.to_string(),
        range: range.to_string(),
    };
    let body = range.trim().trim_end_matches("minutes").trim();

    let (min, max) = match body.split_once('-') {
        Some((lo, hi)) => (
            lo.trim().parse::<u32>().map_err(|_| malformed())?,
            hi.trim().parse::<u32>().map_err(|_| malformed())?,
        ),
        None => {
            let n = body.parse::<u32>().map_err(|_| malformed())?;
            (n, n)
        }
    };
    if min > max {
        return Err(malformed());
    }
    Ok((min, max))
}

/// Coarse age bucket label for an age in months.
pub fn age_bucket(age_months: i32) -> BaselineResult<String> {
    let label = match age_months {
        m if m < 0 => return Err(BaselineError::InvalidAge { age_months }),
        0..=3 => "0-3 months".to_string(),
        4..=9 => format!("{age_months} months"),
        10..=12 => "10-12 months".to_string(),
        13..=15 => "12-15 months".to_string(),
        16..=18 => "15-18 months".to_string(),
        19..=24 => "18-24 months".to_string(),
        _ => "24+ months".to_string(),
    };
    Ok(label)
}

impl BaselineTable {
    /// Parse a table from TOML, validating every range up front.
    pub fn from_toml(toml_str: &str) -> BaselineResult<Self> {
        let parsed: TableToml = toml::from_str(toml_str).map_err(|e| BaselineError::Parse {
            message: e.to_string(),
        })?;

        let buckets = parsed
            .bucket
            .into_iter()
            .map(|b| {
                let (min_minutes, max_minutes) = parse_range(&b.age_range, &b.wake_window)?;
                Ok(Bucket {
                    age_range: b.age_range,
                    wake_window: b.wake_window,
                    naps: b.naps,
                    min_minutes,
                    max_minutes,
                })
            })
            .collect::<BaselineResult<Vec<_>>>()?;

        Ok(Self {
            source: parsed.table.source,
            buckets,
        })
    }

    /// The table bundled into the binary, parsed on first use.
    pub fn bundled() -> BaselineResult<&'static BaselineTable> {
        BUNDLED
            .get_or_init(|| {
                let table = Self::from_toml(BUNDLED_TOML).map_err(|e| e.to_string());
                match &table {
                    Ok(t) => tracing::debug!(buckets = t.len(), "loaded bundled baseline table"),
                    Err(e) => tracing::warn!("failed to parse bundled baseline table: {e}"),
                }
                table
            })
            .as_ref()
            .map_err(|message| BaselineError::Parse {
                message: message.clone(),
            })
    }

    /// Baseline for a child of `age_months`.
    pub fn lookup(&self, age_months: i32) -> BaselineResult<BaselineWindow> {
        let age_range = age_bucket(age_months)?;
        let bucket = self
            .buckets
            .iter()
            .find(|b| b.age_range == age_range)
            .ok_or_else(|| BaselineError::NotFound {
                age_months,
                age_range: age_range.clone(),
            })?;

        Ok(BaselineWindow {
            age_months,
            age_range,
            wake_window_range: bucket.wake_window.clone(),
            min_minutes: bucket.min_minutes,
            max_minutes: bucket.max_minutes,
            average_minutes: (bucket.min_minutes + bucket.max_minutes) / 2,
            nap_count: bucket.naps.clone(),
            source: self.source.clone(),
        })
    }

    /// Number of age buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Baseline from the bundled table.
pub fn baseline_wake_window(age_months: i32) -> BaselineResult<BaselineWindow> {
    BaselineTable::bundled()?.lookup(age_months)
}
