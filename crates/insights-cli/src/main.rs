mod report;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use insights_engine::QueryParams;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "insights-cli")]
#[command(about = "Campaign insights command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print one page of the campaign table.
    Campaigns {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print summary metrics for a date range.
    Metrics {
        #[command(flatten)]
        range: RangeArgs,
        #[command(flatten)]
        data: DataArgs,
    },
    /// Write every filtered row to a CSV file.
    ExportCsv {
        #[arg(long, default_value = insights_engine::export::CSV_FILE_NAME)]
        output: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        data: DataArgs,
    },
    /// Apply live-update ticks and print totals after each one.
    Watch {
        #[arg(long, default_value_t = 3)]
        ticks: u32,
        /// Seconds between ticks; 0 applies them back to back.
        #[arg(long, default_value_t = 0)]
        every: u64,
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct RangeArgs {
    /// Inclusive lower bound, `yyyy-MM-dd`.
    #[arg(long)]
    start_date: Option<String>,
    /// Inclusive upper bound, `yyyy-MM-dd`.
    #[arg(long)]
    end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
struct FilterArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    direction: Option<String>,
    #[arg(long)]
    page: Option<usize>,
    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Debug, Clone, Copy, Default, Args)]
struct DataArgs {
    /// Seed for a reproducible generated dataset.
    #[arg(long)]
    seed: Option<u64>,
}

impl FilterArgs {
    fn into_params(self) -> QueryParams {
        QueryParams {
            search: self.search,
            channel: self.channel,
            status: self.status,
            sort: self.sort,
            direction: self.direction,
            page: self.page,
            start_date: self.range.start_date,
            end_date: self.range.end_date,
        }
    }
}

impl RangeArgs {
    fn into_params(self) -> QueryParams {
        QueryParams {
            start_date: self.start_date,
            end_date: self.end_date,
            ..QueryParams::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = insights_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    match cli.command {
        Some(Commands::Campaigns { filters, data }) => {
            let store = report::load_store(&config, data.seed);
            report::print_campaigns(&mut out, &store, &filters.into_params(), config.page_size)?;
        }
        Some(Commands::Metrics { range, data }) => {
            let store = report::load_store(&config, data.seed);
            report::print_metrics(&mut out, &store, &range.into_params())?;
        }
        Some(Commands::ExportCsv {
            output,
            filters,
            data,
        }) => {
            let store = report::load_store(&config, data.seed);
            let rows = report::export_csv(&store, &filters.into_params(), &output)?;
            writeln!(out, "wrote {rows} rows to {}", output.display())?;
        }
        Some(Commands::Watch { ticks, every, data }) => {
            let store = report::load_store(&config, data.seed);
            report::watch(&mut out, &store, ticks, every, data.seed).await?;
        }
        None => writeln!(out, "insights-cli ready")?,
    }

    Ok(())
}
