use clap::{Parser, Subcommand, ValueEnum};
use job_parser::config::{AppConfig, StorageConfig};
use job_parser::error::AppError;
use job_parser::sources::{
    collect_vacancies, HeadHunterSource, HttpTransport, ReqwestTransport, SearchQuery,
    SuperJobSource, VacancySource,
};
use job_parser::storage::{detect_existing, open_store, StorageFormat, VacancyRow, VacancyStore};
use job_parser::telemetry;
use job_parser::vacancy::{RankOrdering, VacancyField};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "job-parser",
    about = "Search HeadHunter and SuperJob for vacancies and query the saved results",
    version
)]
struct Cli {
    /// File encoding to use; query commands otherwise use whichever file exists
    #[arg(long, global = true)]
    format: Option<StorageFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch vacancies from the job platforms and save them
    Search(SearchArgs),
    /// Print every saved vacancy
    List,
    /// Print saved vacancies whose lower salary bound is at least MIN
    Salary { min: i64 },
    /// Print saved vacancies located in CITY
    City { name: String },
    /// Print the first N saved vacancies
    Top { count: usize },
    /// Delete every saved vacancy with exactly this title
    Delete { title: String },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Job title to search for
    #[arg(long)]
    query: String,
    /// Minimum desired salary
    #[arg(long)]
    min_salary: Option<u32>,
    /// Number of vacancies to request from each platform
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: Option<u32>,
    #[arg(long, value_enum, default_value_t = Platform::All)]
    platform: Platform,
    /// Order results by salary midpoint, highest first
    #[arg(long)]
    sort_by_rank: bool,
    /// Print results instead of saving them
    #[arg(long)]
    no_save: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    #[value(name = "hh")]
    HeadHunter,
    #[value(name = "sj")]
    SuperJob,
    All,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Search(args) => run_search(&config, cli.format, args),
        Command::List => with_saved_store(&config.storage, cli.format, |store| {
            print_rows(&store.load()?);
            Ok(())
        }),
        Command::Salary { min } => with_saved_store(&config.storage, cli.format, |store| {
            print_rows(&store.filter_by_salary_floor(min)?);
            Ok(())
        }),
        Command::City { name } => with_saved_store(&config.storage, cli.format, |store| {
            print_rows(&store.filter_by_city(&name)?);
            Ok(())
        }),
        Command::Top { count } => with_saved_store(&config.storage, cli.format, |store| {
            print_rows(&store.top(count)?);
            Ok(())
        }),
        Command::Delete { title } => with_saved_store(&config.storage, cli.format, |store| {
            let removed = store.delete(&title)?;
            println!(
                "{removed} vacancies titled '{title}' deleted from the {} file {}",
                store.format(),
                store.path().display()
            );
            Ok(())
        }),
    }
}

fn run_search(
    config: &AppConfig,
    format: Option<StorageFormat>,
    args: SearchArgs,
) -> Result<(), AppError> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::with_runtime()?);
    let headhunter = HeadHunterSource::from_config(transport.clone(), &config.sources);
    let superjob = SuperJobSource::from_config(transport, &config.sources);

    let sources: Vec<&dyn VacancySource> = match args.platform {
        Platform::HeadHunter => vec![&headhunter],
        Platform::SuperJob => vec![&superjob],
        Platform::All => vec![&headhunter, &superjob],
    };

    let mut query = SearchQuery::new(args.query);
    if let Some(min_salary) = args.min_salary {
        query = query.with_min_salary(min_salary);
    }
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }

    let mut vacancies = collect_vacancies(&sources, &query)?;
    if vacancies.is_empty() {
        println!("Job search failed, try changing the request parameters");
        return Ok(());
    }
    println!("Job search completed: {} vacancies found", vacancies.len());

    if args.sort_by_rank {
        RankOrdering.sort_descending(&mut vacancies);
    }

    if args.no_save {
        for vacancy in &vacancies {
            println!("{vacancy}");
        }
        return Ok(());
    }

    let format = format.unwrap_or(config.storage.default_format);
    let store = open_store(format, config.storage.path_for(format), vacancies);
    store.save()?;
    info!(%format, path = %store.path().display(), "search results saved");
    println!("Vacancies saved to {}", store.path().display());
    Ok(())
}

/// Resolves which saved file to query: the requested format's file if it
/// exists, otherwise the JSON file, then the CSV file.
fn resolve_saved(
    storage: &StorageConfig,
    format: Option<StorageFormat>,
) -> Option<(StorageFormat, PathBuf)> {
    match format {
        Some(format) => {
            let path = storage.path_for(format);
            path.is_file().then(|| (format, path.clone()))
        }
        None => detect_existing(&storage.json_path, &storage.csv_path),
    }
}

fn with_saved_store<F>(
    storage: &StorageConfig,
    format: Option<StorageFormat>,
    action: F,
) -> Result<(), AppError>
where
    F: FnOnce(&dyn VacancyStore) -> Result<(), AppError>,
{
    let Some((format, path)) = resolve_saved(storage, format) else {
        println!("There is no file with vacancies");
        return Ok(());
    };

    let store = open_store(format, path, Vec::new());
    action(store.as_ref())
}

fn print_rows(rows: &[VacancyRow]) {
    if rows.is_empty() {
        println!("No matching vacancies");
        return;
    }

    for row in rows {
        for field in VacancyField::ALL {
            let value = row.get(field.name()).map(display_value).unwrap_or_default();
            println!("{}: {}", field.label(), value);
        }
        println!();
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storage_in(dir: &std::path::Path) -> StorageConfig {
        StorageConfig {
            json_path: dir.join("vacancies.json"),
            csv_path: dir.join("vacancies.csv"),
            default_format: StorageFormat::Json,
        }
    }

    #[test]
    fn search_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["job-parser", "search", "--query", "rust"])
            .expect("arguments parse");
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "rust");
                assert_eq!(args.platform, Platform::All);
                assert!(args.limit.is_none());
                assert!(!args.no_save);
            }
            other => panic!("expected search, got {other:?}"),
        }
        assert!(cli.format.is_none());
    }

    #[test]
    fn limit_above_one_hundred_is_rejected() {
        let result =
            Cli::try_parse_from(["job-parser", "search", "--query", "rust", "--limit", "500"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_format_accepts_any_case() {
        let cli = Cli::try_parse_from(["job-parser", "top", "3", "--format", "CSV"])
            .expect("arguments parse");
        assert_eq!(cli.format, Some(StorageFormat::Csv));
        assert!(matches!(cli.command, Command::Top { count: 3 }));
    }

    #[test]
    fn resolve_saved_honours_requested_format_only_when_file_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage_in(dir.path());

        assert!(resolve_saved(&storage, None).is_none());

        std::fs::write(&storage.json_path, "[]").expect("seed json");
        assert!(resolve_saved(&storage, Some(StorageFormat::Csv)).is_none());
        assert_eq!(
            resolve_saved(&storage, None),
            Some((StorageFormat::Json, storage.json_path.clone()))
        );
    }

    #[test]
    fn display_value_renders_null_as_none() {
        assert_eq!(display_value(&Value::Null), "None");
        assert_eq!(display_value(&json!("Acme")), "Acme");
        assert_eq!(display_value(&json!(120000)), "120000");
    }
}
