use crate::pipeline::{self, FetchArgs, NormalizeArgs, RatesImportArgs, RatesReshapeArgs};
use crate::reports::{self, DocumentArgs, SqlReportArgs, TableArgs};
use clap::{Parser, Subcommand};
use tracing::debug;
use vacancy_analytics::config::AppConfig;
use vacancy_analytics::error::AppError;
use vacancy_analytics::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-analytics",
    about = "Fetch, normalize and report on vacancy salaries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download vacancies from the HeadHunter API into a raw CSV
    Fetch(FetchArgs),
    /// Prepare and persist monthly exchange rates
    Rates {
        #[command(subcommand)]
        command: RatesCommand,
    },
    /// Convert a raw vacancy export to roubles and store it
    Normalize(NormalizeArgs),
    /// Print the yearly and per-city summaries computed in SQLite
    SqlReport(SqlReportArgs),
    /// Print a filtered, sorted vacancy table
    Table(TableArgs),
    /// Write an HTML report with salary and city charts
    Document(DocumentArgs),
}

#[derive(Subcommand, Debug)]
enum RatesCommand {
    /// Pivot the long-form rate export into one row per month
    Reshape(RatesReshapeArgs),
    /// Load a wide rate CSV into the currency database
    Import(RatesImportArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Fetch(args) => pipeline::fetch(args, &config).await,
        Command::Rates {
            command: RatesCommand::Reshape(args),
        } => pipeline::reshape_rates(args),
        Command::Rates {
            command: RatesCommand::Import(args),
        } => pipeline::import_rates(args, &config),
        Command::Normalize(args) => pipeline::normalize(args, &config),
        Command::SqlReport(args) => reports::sql_report(args, &config),
        Command::Table(args) => reports::table(args),
        Command::Document(args) => reports::document(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_nested_rates_command() {
        let cli = Cli::try_parse_from([
            "vacancy-analytics",
            "rates",
            "reshape",
            "--input",
            "raw.csv",
            "--output",
            "wide.csv",
        ])
        .expect("parse");
        match cli.command {
            Command::Rates {
                command: RatesCommand::Reshape(args),
            } => {
                assert_eq!(args.input, PathBuf::from("raw.csv"));
                assert_eq!(args.output, PathBuf::from("wide.csv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn table_arguments_are_optional() {
        let cli = Cli::try_parse_from(["vacancy-analytics", "table", "--filter", ""]).expect("parse");
        match cli.command {
            Command::Table(args) => {
                assert_eq!(args.filter.as_deref(), Some(""));
                assert!(args.file.is_none());
                assert!(args.columns.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn normalize_requires_input() {
        assert!(Cli::try_parse_from(["vacancy-analytics", "normalize"]).is_err());
    }
}
