use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use vacancy_analytics::config::AppConfig;
use vacancy_analytics::error::AppError;
use vacancy_analytics::storage::{RateStore, VacancyStore};
use vacancy_analytics::workflows::currency::reshape::reshape;
use vacancy_analytics::workflows::fetch::{fetch_all, write_raw_csv, HhApiClient};
use vacancy_analytics::workflows::ingest::{write_normalized_csv, VacancyImporter};

#[derive(Args, Debug)]
pub(crate) struct FetchArgs {
    /// Destination of the merged raw vacancy CSV
    #[arg(long, default_value = "vacancies_from_hh.csv")]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RatesReshapeArgs {
    /// Long-form export with Year, Month, CharCode and InRuR columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination of the wide per-month table
    #[arg(long)]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RatesImportArgs {
    /// Wide rate CSV produced by `rates reshape`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured currency database
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Raw vacancy export
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured currency database
    #[arg(long)]
    pub(crate) rates_db: Option<PathBuf>,
    /// Override the configured vacancy database
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
    /// Also write the normalized vacancies as CSV
    #[arg(long)]
    pub(crate) csv_output: Option<PathBuf>,
}

pub(crate) async fn fetch(args: FetchArgs, config: &AppConfig) -> Result<(), AppError> {
    let client = Arc::new(HhApiClient::new(&config.fetch)?);
    let vacancies = fetch_all(client, &config.fetch).await?;

    write_raw_csv(BufWriter::new(File::create(&args.output)?), &vacancies)?;
    info!(output = %args.output.display(), vacancies = vacancies.len(), "raw vacancies written");
    Ok(())
}

pub(crate) fn reshape_rates(args: RatesReshapeArgs) -> Result<(), AppError> {
    let table = reshape(File::open(&args.input)?)?;
    table.write_csv(BufWriter::new(File::create(&args.output)?))?;
    info!(output = %args.output.display(), "wide rate table written");
    Ok(())
}

pub(crate) fn import_rates(args: RatesImportArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = args
        .db
        .unwrap_or_else(|| config.storage.currency_db_path.clone());
    let mut store = RateStore::open(&db)?;
    let months = store.import_wide_csv(File::open(&args.input)?)?;
    info!(db = %db.display(), months, "exchange rates imported");
    Ok(())
}

pub(crate) fn normalize(args: NormalizeArgs, config: &AppConfig) -> Result<(), AppError> {
    let rates_db = args
        .rates_db
        .unwrap_or_else(|| config.storage.currency_db_path.clone());
    let rates = RateStore::open(&rates_db)?.load()?;

    let importer = VacancyImporter::new(&rates, config.pipeline.min_currency_count);
    let outcome = importer.from_path(&args.input)?;

    let db = args
        .db
        .unwrap_or_else(|| config.storage.vacancy_db_path.clone());
    let mut store = VacancyStore::open(&db)?;
    let stored = store.replace_all(&outcome.vacancies)?;

    if let Some(path) = &args.csv_output {
        write_normalized_csv(BufWriter::new(File::create(path)?), &outcome.vacancies)?;
        info!(output = %path.display(), "normalized vacancies written");
    }

    let summary = &outcome.summary;
    println!(
        "Прочитано строк: {}, сохранено вакансий: {}, отброшено: {}",
        summary.rows_read,
        stored,
        summary.rejected_total()
    );
    for (reason, count) in &summary.rejected {
        println!("  {}: {}", reason.label(), count);
    }
    Ok(())
}
