//! CLI entry point for the Energy Assistant.
//!
//! Without a subcommand, starts the interactive query prompt. The `dashboard`
//! subcommand answers one query with region/date filters, and `overview`
//! prints whole-dataset metrics.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use energy_assistant::analyzers::aggregate;
use energy_assistant::config::AppConfig;
use energy_assistant::dataset::DatasetStore;
use energy_assistant::filter::FilterSpec;
use energy_assistant::output;
use energy_assistant::prompt;
use energy_assistant::router::Surface;
use energy_assistant::session::Session;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "energy_assistant")]
#[command(about = "Answer questions about energy consumption and outage data", long_about = None)]
struct Cli {
    /// Consumption log CSV (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    consumption: Option<PathBuf>,

    /// Outage report CSV (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    outages: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single query with the dashboard's rules and filters
    Dashboard {
        /// Free-text question
        #[arg(value_name = "QUERY")]
        query: String,

        /// Region to restrict to ("All" for no restriction)
        #[arg(short, long)]
        region: Option<String>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print the structured result as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also print per-region statistics and outage causes
        #[arg(long, default_value_t = false)]
        analytics: bool,
    },
    /// Print metrics for the whole dataset
    Overview {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut config = AppConfig::load()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = config.output.log_file_path.clone();
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("energy_assistant.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so log lines don't interleave with the prompt
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Some(path) = cli.consumption {
        config.data.consumption_path = path;
    }
    if let Some(path) = cli.outages {
        config.data.outage_path = path;
    }

    let store = match DatasetStore::load(&config.data.consumption_path, &config.data.outage_path)
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Dataset load failed");
            eprintln!("Please make sure the data files exist: {e}");
            return Err(e.into());
        }
    };

    match cli.command {
        None => {
            let session =
                Session::new(store, Surface::Cli).with_plot_path(&config.output.plot_path);
            prompt::run(&session, std::io::stdin().lock(), std::io::stdout())?;
        }
        Some(Commands::Dashboard {
            query,
            region,
            start,
            end,
            json,
            analytics,
        }) => {
            let mut filter = FilterSpec::default().with_range(start, end);
            if let Some(region) = region.filter(|r| r != "All") {
                filter = filter.with_region(region);
            }

            let session = Session::new(store, Surface::Dashboard)
                .with_filter(filter)
                .with_plot_path(&config.output.plot_path);

            if json {
                match session.evaluate(&query) {
                    Ok(result) => println!("{}", output::to_json(&result)?),
                    Err(e) => println!("{}", session.describe(&e)),
                }
                if analytics {
                    println!("{}", output::to_json(&session.analytics())?);
                }
            } else {
                println!("{}", session.answer(&query));
                if analytics {
                    println!("\n{}", output::render_analytics(&session.analytics()));
                }
            }
        }
        Some(Commands::Overview { json }) => {
            let overview = aggregate::overview(&store);
            if json {
                println!("{}", output::to_json(&overview)?);
            } else {
                println!("{}", output::render_overview(&overview));
            }
        }
    }

    Ok(())
}
