// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # wakewindow
//!
//! A rule-based infant wake window planner. Caregivers report how a sleep
//! period went; the planner classifies the wake window that preceded it and
//! says how to adjust it, then does the clock arithmetic for the day.
//!
//! ## Architecture
//!
//! - **Vocabularies** (`vocab`): closed sets of observed behaviours
//! - **Assessment** (`assess`): the deterministic decision tree
//! - **Clock** (`clock`): 24-hour times, durations and next-sleep times
//! - **Schedule** (`schedule`): window adjustment with a floor, daily layout
//! - **Baselines** (`baseline`): age-indexed reference windows
//! - **Tools** (`tool`, `tools`): name-addressed JSON tool interface with
//!   caller-owned session state (`session`)
//!
//! ## Library usage
//!
//! ```no_run
//! use wakewindow::assess::AssessmentRequest;
//! use wakewindow::config::PlannerConfig;
//! use wakewindow::planner::Planner;
//! use wakewindow::vocab::{PutDownBehavior, SleepType};
//!
//! let planner = Planner::new(PlannerConfig::default()).unwrap();
//! let req = AssessmentRequest::new(
//!     "nap1",
//!     SleepType::Independent,
//!     PutDownBehavior::CriesImmediately,
//!     5,
//! );
//! let revision = planner.revise_window(150, &req).unwrap();
//! assert_eq!(revision.adjustment.new_minutes, 135);
//!
//! let next = planner.next_sleep_time("09:15", 135).unwrap();
//! println!("next sleep at {}", next.next_sleep_time);
//! ```

pub mod assess;
pub mod baseline;
pub mod clock;
pub mod config;
pub mod error;
pub mod planner;
pub mod schedule;
pub mod session;
pub mod tool;
pub mod tools;
pub mod vocab;
