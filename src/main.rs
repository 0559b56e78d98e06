//! wakewindow CLI: infant wake window planner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use wakewindow::assess::AssessmentRequest;
use wakewindow::config::PlannerConfig;
use wakewindow::planner::Planner;
use wakewindow::session::SessionState;
use wakewindow::tool::{ToolInput, ToolRegistry};
use wakewindow::vocab::{NightPattern, PutDownBehavior, SleepType, WakeMood};

#[derive(Parser)]
#[command(name = "wakewindow", version, about = "Infant wake window planner")]
struct Cli {
    /// Path to a TOML config file (defaults to $XDG_CONFIG_HOME/wakewindow/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a sleep period and recommend a wake window adjustment.
    Assess(Observation),

    /// Assess a sleep period and apply the adjustment to the preceding window.
    Revise {
        /// Current length of the preceding wake window in minutes.
        #[arg(long)]
        current: u32,

        #[command(flatten)]
        observation: Observation,
    },

    /// Minutes slept between put-down and wake-up (HH:MM, 24-hour).
    Duration {
        put_down: String,
        wake_up: String,
    },

    /// When the next sleep should start.
    NextSleep {
        /// Wake time (HH:MM, 24-hour).
        wake_time: String,

        /// Wake window in minutes.
        #[arg(long)]
        window: u32,
    },

    /// Apply a delta to a wake window (never below 30 minutes).
    Adjust {
        /// Current wake window in minutes.
        current: u32,

        /// Signed adjustment in minutes, e.g. 15 or -15.
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },

    /// Lay out a full day of naps and bedtime.
    Schedule {
        /// Morning wake time (HH:MM, 24-hour).
        wake_time: String,

        /// Wake windows in minutes, comma-separated (e.g. "120,150,180").
        #[arg(long, value_delimiter = ',')]
        windows: Vec<u32>,

        /// Number of naps.
        #[arg(long)]
        naps: usize,
    },

    /// Age-appropriate baseline wake window.
    Baseline {
        /// Age in months.
        #[arg(allow_hyphen_values = true)]
        age_months: i32,
    },

    /// List the registered tools and their parameters.
    Tools,

    /// Call a tool by name with JSON parameters and print the result envelope.
    Call {
        /// Tool name (see `wakewindow tools`).
        name: String,

        /// JSON object of parameters.
        #[arg(long, default_value = "{}")]
        params: String,
    },

    /// Print the effective configuration as TOML.
    Config,
}

/// Observations about one sleep period.
#[derive(Args)]
struct Observation {
    /// Identifier for the window (e.g. "nap1", "bedtime").
    #[arg(long)]
    window_id: String,

    /// "independent" or "assisted".
    #[arg(long)]
    sleep_type: SleepType,

    /// "cries_immediately", "plays_fusses_long" or "calm".
    #[arg(long)]
    putdown_behavior: PutDownBehavior,

    /// Minutes taken to fall asleep.
    #[arg(long)]
    time_to_sleep: u32,

    /// This is bedtime rather than a nap.
    #[arg(long)]
    bedtime: bool,

    /// "crying", "happy" or "neutral".
    #[arg(long, default_value = "neutral")]
    wake_mood: WakeMood,

    /// Nap duration in minutes.
    #[arg(long)]
    nap_duration: Option<u32>,

    /// "frequent_wakings", "split_nights" or "normal".
    #[arg(long, default_value = "normal")]
    night_pattern: NightPattern,

    /// Assisted sleep only: the baby was crying before sleep was offered.
    #[arg(long)]
    crying_before_offered: bool,
}

impl Observation {
    fn into_request(self) -> AssessmentRequest {
        let mut req = AssessmentRequest::new(
            self.window_id,
            self.sleep_type,
            self.putdown_behavior,
            self.time_to_sleep,
        )
        .with_wake_mood(self.wake_mood)
        .with_crying_before_offered(self.crying_before_offered);
        if self.bedtime {
            req = req.bedtime(self.night_pattern);
        }
        if let Some(nap) = self.nap_duration {
            req = req.with_nap(nap, self.wake_mood);
        }
        req
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = PlannerConfig::load_or_default(cli.config.as_deref())?;

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let planner = Planner::new(config)?;

    match cli.command {
        Commands::Assess(observation) => {
            print_json(&planner.assess(&observation.into_request()))?;
        }

        Commands::Revise {
            current,
            observation,
        } => {
            print_json(&planner.revise_window(current, &observation.into_request())?)?;
        }

        Commands::Duration { put_down, wake_up } => {
            print_json(&planner.sleep_duration(&put_down, &wake_up)?)?;
        }

        Commands::NextSleep { wake_time, window } => {
            print_json(&planner.next_sleep_time(&wake_time, window)?)?;
        }

        Commands::Adjust { current, delta } => {
            print_json(&planner.adjust_window(current, delta))?;
        }

        Commands::Schedule {
            wake_time,
            windows,
            naps,
        } => {
            print_json(&planner.daily_schedule(&wake_time, &windows, naps)?)?;
        }

        Commands::Baseline { age_months } => {
            print_json(&planner.baseline(age_months)?)?;
        }

        Commands::Tools => {
            let registry = ToolRegistry::with_builtin_tools();
            for sig in registry.list() {
                println!("{}", sig.name);
                println!("  {}", sig.description);
                for param in &sig.parameters {
                    let marker = if param.required { "*" } else { " " };
                    println!("  {marker} {:<24} {}", param.name, param.description);
                }
                println!();
            }
        }

        Commands::Call { name, params } => {
            let value: serde_json::Value = serde_json::from_str(&params).into_diagnostic()?;
            let input = ToolInput::from_json(value)?;
            let registry = ToolRegistry::with_builtin_tools();
            let mut session = SessionState::new();
            let output = registry.dispatch(&name, input, &planner, &mut session);
            print_json(&output.to_json())?;
        }

        Commands::Config => {}
    }

    Ok(())
}
