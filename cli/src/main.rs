mod dashboard;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wellness_core::{
    default_data_dir, parse_day, parse_metric_args, Clock, FileStore, FixedClock,
    MetricKind, Settings, SystemClock, WellnessService,
};

#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Daily wellness metrics tracker", long_about = None)]
struct Cli {
    /// Directory holding storage.json and config.toml (default: ~/.wellness)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this day as today (today, yesterday, -1d, 2024-01-01)
    #[arg(long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show today's metrics
    Show {
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite current values (usage: set steps:4000 water:1.5)
    Set {
        #[arg(required = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Add to current values (usage: add steps:1500 w:0.25)
    Add {
        #[arg(required = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Add the configured quick-add step to one metric
    Quick {
        metric: String,
        /// Subtract the step instead
        #[arg(long)]
        undo: bool,
    },
    /// Reset all metrics to zero now
    Reset,
    /// Show the last reset date
    Status,
    /// Delete all persisted wellness data
    Clear,
    /// Open the terminal dashboard
    Tui,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let settings = Settings::new(Some(&config_dir)).context("Failed to load configuration")?;
    init_logging(&settings.log_level);

    let data_dir = cli.data_dir.clone().or(settings.data_dir.clone());
    let storage = FileStore::new(data_dir)?;
    debug!(path = %storage.path().display(), "using storage");

    let clock: Box<dyn Clock> = match &cli.date {
        Some(day) => Box::new(FixedClock(parse_day(day, Local::now().date_naive())?)),
        None => Box::new(SystemClock),
    };

    let mut service = WellnessService::open(storage, clock.as_ref(), settings.quick_add.clone());

    match cli.command {
        Some(Commands::Show { json }) => {
            let snapshot = service.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                dashboard::show_dashboard(&snapshot);
            }
        }
        Some(Commands::Set { args }) => {
            for (kind, value) in parse_metric_args(&args)? {
                let metric = service.update(kind, value)?;
                println!("{}: {} ({}%)", kind.label(), dashboard::format_amount(kind, metric.current), metric.percentage);
            }
        }
        Some(Commands::Add { args }) => {
            for (kind, delta) in parse_metric_args(&args)? {
                let metric = service.increment(kind, delta)?;
                println!("{}: {} ({}%)", kind.label(), dashboard::format_amount(kind, metric.current), metric.percentage);
            }
        }
        Some(Commands::Quick { metric, undo }) => {
            let kind: MetricKind = metric.parse()?;
            let metric = service.quick_add(kind, undo)?;
            println!("{}: {} ({}%)", kind.label(), dashboard::format_amount(kind, metric.current), metric.percentage);
        }
        Some(Commands::Reset) => {
            service.reset()?;
            println!("All metrics reset.");
        }
        Some(Commands::Status) => {
            let last = service.last_reset()?;
            println!("Today:      {}", service.today());
            println!("Last reset: {}", last.as_deref().unwrap_or("never"));
            println!("Startup:    {:?}", service.startup_outcome());
            println!("Gate:       {:?}", service.gate().state());
        }
        Some(Commands::Clear) => {
            service.clear()?;
            println!("Wellness data cleared.");
        }
        Some(Commands::Tui) | None => {
            tui::run(service)?;
        }
    }
    Ok(())
}
