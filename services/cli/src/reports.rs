use crate::prompt::Prompter;
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use vacancy_analytics::config::AppConfig;
use vacancy_analytics::error::AppError;
use vacancy_analytics::storage::VacancyStore;
use vacancy_analytics::workflows::ingest::{is_empty_csv, read_normalized_csv};
use vacancy_analytics::workflows::listing::{self, InputError, ListingError, ListingQuery};
use vacancy_analytics::workflows::report::write_document;
use vacancy_analytics::workflows::stats::{SalaryRecord, VacancyStatistics};

const FILE_PROMPT: &str = "Введите название файла: ";
const PROFESSION_PROMPT: &str = "Введите название профессии: ";

#[derive(Args, Debug)]
pub(crate) struct SqlReportArgs {
    /// Override the configured vacancy database
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
    /// Substring of the vacancy name that selects the profession
    #[arg(long)]
    pub(crate) profession: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct TableArgs {
    /// Full vacancy export
    #[arg(long)]
    pub(crate) file: Option<String>,
    /// Filter as "<parameter>: <value>", empty for none
    #[arg(long)]
    pub(crate) filter: Option<String>,
    /// Parameter to sort by, empty to keep file order
    #[arg(long)]
    pub(crate) sort: Option<String>,
    /// "Да" for descending order
    #[arg(long)]
    pub(crate) reverse: Option<String>,
    /// One-based "start [end]" window of rows
    #[arg(long)]
    pub(crate) range: Option<String>,
    /// Comma separated column headers
    #[arg(long)]
    pub(crate) columns: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DocumentArgs {
    /// Normalized vacancy CSV
    #[arg(long)]
    pub(crate) file: Option<String>,
    /// Substring of the vacancy name that selects the profession
    #[arg(long)]
    pub(crate) profession: Option<String>,
    /// Directory that receives the HTML document and its chart
    #[arg(long, default_value = "report")]
    pub(crate) output_dir: PathBuf,
}

pub(crate) fn sql_report(args: SqlReportArgs, config: &AppConfig) -> Result<(), AppError> {
    let profession = Prompter::stdio().value(args.profession, PROFESSION_PROMPT)?;
    let db = args
        .db
        .unwrap_or_else(|| config.storage.vacancy_db_path.clone());

    let summary = VacancyStore::open(&db)?.sql_summary(&profession)?;
    print!("{summary}");
    Ok(())
}

pub(crate) fn table(args: TableArgs) -> Result<(), AppError> {
    let mut prompter = Prompter::stdio();
    let file = prompter.value(args.file, FILE_PROMPT)?;
    let filter = prompter.value(args.filter, "Введите параметр фильтрации: ")?;
    let sort = prompter.value(args.sort, "Введите параметр сортировки: ")?;
    let reverse = prompter.value(args.reverse, "Обратный порядок сортировки (Да / Нет): ")?;
    let range = prompter.value(args.range, "Введите диапазон вывода: ")?;
    let columns = prompter.value(args.columns, "Введите требуемые столбцы: ")?;

    let rendered = listing::load_listing(&file).and_then(|vacancies| {
        let query = ListingQuery::parse(&filter, &sort, &reverse, &range, &columns)?;
        Ok(listing::render(&vacancies, &query)?)
    });

    match rendered {
        Ok(table) => println!("{table}"),
        Err(err) => report_to_user(err)?,
    }
    Ok(())
}

pub(crate) fn document(args: DocumentArgs, config: &AppConfig) -> Result<(), AppError> {
    let mut prompter = Prompter::stdio();
    let file = prompter.value(args.file, FILE_PROMPT)?;
    let profession = prompter.value(args.profession, PROFESSION_PROMPT)?;

    if is_empty_csv(File::open(&file)?)? {
        println!("{}", InputError::EmptyFile);
        return Ok(());
    }
    let vacancies = read_normalized_csv(File::open(&file)?)?;
    if vacancies.is_empty() {
        println!("{}", InputError::NoData);
        return Ok(());
    }

    let records = SalaryRecord::from_vacancies(&vacancies);
    let stats = VacancyStatistics::compute(&records, &profession, &config.pipeline);
    let paths = write_document(&stats, &args.output_dir)?;

    info!(
        profession = %profession,
        vacancies = stats.total,
        "document report finished"
    );
    println!("{}", paths.document.display());
    Ok(())
}

/// User mistakes are printed and end the command successfully; anything
/// else is a real failure.
fn report_to_user(err: ListingError) -> Result<(), AppError> {
    match err.user_message() {
        Some(message) => {
            println!("{message}");
            Ok(())
        }
        None => Err(err.into()),
    }
}
