//! Command-line interface for fundamental tear sheets.
//!
//! ```bash
//! tearsheet time-series AAPL.xlsx AAPL
//! tearsheet compare peers.xlsx Semis,NVDA,AMD,Software,MSFT
//! tearsheet overview NVDA.xlsx NVDA --print
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tearsheet::{
    MetricTable, ReportPipeline, SectorList, Symbol,
    output::{comparison_sheet, overview_sheet, time_series_sheet, write_workbook},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod settings;

#[derive(Debug, Parser)]
#[command(name = "tearsheet")]
#[command(about = "Fundamental tear sheets from Sharadar data, written to Excel", long_about = None)]
#[command(version)]
struct Cli {
    /// Metric catalogue JSON replacing the built-in one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Credentials file with an `api_key` entry
    #[arg(long, global = true, default_value = "credentials.json")]
    credentials: PathBuf,

    /// Nasdaq Data Link API key
    #[arg(long, global = true, env = "NASDAQ_DATA_LINK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Per-year metrics for one ticker
    TimeSeries {
        /// Workbook to write
        output: PathBuf,
        /// Ticker symbol
        ticker: Symbol,
        /// Also print the table
        #[arg(long)]
        print: bool,
    },

    /// LTM metrics for tickers grouped by sector
    Compare {
        /// Workbook to write
        output: PathBuf,
        /// Comma separated sectors and tickers, e.g. Semis,NVDA,AMD,Software,MSFT
        sectors: SectorList,
        /// Also print the table
        #[arg(long)]
        print: bool,
    },

    /// Single-page overview with a DCF block
    Overview {
        /// Workbook to write
        output: PathBuf,
        /// Ticker symbol
        ticker: Symbol,
        /// Discount rate for the DCF instead of the WACC estimate
        #[arg(long)]
        discount_rate: Option<f64>,
        /// Also print the table
        #[arg(long)]
        print: bool,
    },
}

fn print_table(table: &MetricTable) -> Result<()> {
    println!("{}", table.to_frame()?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let catalog = settings::catalog(cli.config.as_deref())?;
    let api_key = settings::api_key(cli.api_key, &cli.credentials)?;
    let pipeline = ReportPipeline::new().with_sharadar(api_key).with_yahoo();

    match cli.command {
        Command::TimeSeries {
            output,
            ticker,
            print,
        } => {
            let table = pipeline.time_series(&ticker).await?;
            if print {
                print_table(&table)?;
            }
            let sheet = time_series_sheet(&catalog, ticker.as_str(), &table)?;
            write_workbook(&[sheet], &output)?;
            info!(ticker = %ticker, output = %output.display(), "time series written");
        }
        Command::Compare {
            output,
            sectors,
            print,
        } => {
            let table = pipeline.comparison(&sectors).await?;
            if print {
                print_table(&table)?;
            }
            let sheet = comparison_sheet(&catalog, &sectors, &table)?;
            write_workbook(&[sheet], &output)?;
            info!(tickers = sectors.len(), output = %output.display(), "comparison written");
        }
        Command::Overview {
            output,
            ticker,
            discount_rate,
            print,
        } => {
            let report = pipeline.overview(&ticker, discount_rate).await?;
            if print {
                print_table(&report.table)?;
            }
            let sheet =
                overview_sheet(&catalog, ticker.as_str(), &report.table, report.discount_rate)?;
            write_workbook(&[sheet], &output)?;
            info!(ticker = %ticker, output = %output.display(), "overview written");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tearsheet=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_parses_sectors() {
        let cli = Cli::try_parse_from([
            "tearsheet",
            "compare",
            "out.xlsx",
            "Semis,NVDA,AMD,Software,MSFT",
        ])
        .unwrap();
        let Command::Compare { sectors, print, .. } = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(sectors.len(), 3);
        assert_eq!(sectors.groups()[1].name.as_deref(), Some("Software"));
        assert!(!print);
    }

    #[test]
    fn test_overview_discount_rate() {
        let cli = Cli::try_parse_from([
            "tearsheet",
            "overview",
            "nvda.xlsx",
            "nvda",
            "--discount-rate",
            "0.09",
            "--api-key",
            "k",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        let Command::Overview {
            ticker,
            discount_rate,
            ..
        } = cli.command
        else {
            panic!("expected overview");
        };
        assert_eq!(ticker.as_str(), "NVDA");
        assert_eq!(discount_rate, Some(0.09));
    }
}
