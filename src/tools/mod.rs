//! Built-in planner tools: sleep duration, next sleep time, window
//! adjustment, daily schedule, wake window assessment, baseline lookup.

pub mod adjust_window;
pub mod assess_window;
pub mod baseline;
pub mod daily_schedule;
pub mod next_sleep;
pub mod sleep_duration;

pub use adjust_window::AdjustWindowTool;
pub use assess_window::AssessWindowTool;
pub use baseline::BaselineTool;
pub use daily_schedule::DailyScheduleTool;
pub use next_sleep::NextSleepTool;
pub use sleep_duration::SleepDurationTool;

use crate::tool::Tool;

/// Every built-in tool, boxed for registration.
pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SleepDurationTool),
        Box::new(NextSleepTool),
        Box::new(AdjustWindowTool),
        Box::new(DailyScheduleTool),
        Box::new(AssessWindowTool),
        Box::new(BaselineTool),
    ]
}
