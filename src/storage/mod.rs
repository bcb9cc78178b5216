mod csv_store;
mod json_store;
mod query;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::vacancy::Vacancy;

pub use csv_store::CsvVacancyStore;
pub use json_store::JsonVacancyStore;

/// One stored vacancy as read back from a file, keyed by field name in file
/// order. JSON rows keep native types; CSV rows hold strings only.
pub type VacancyRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
        }
    }
}

impl FromStr for StorageFormat {
    type Err = UnknownFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(UnknownFormat(value.to_string())),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown storage format '{0}', expected 'json' or 'csv'")]
pub struct UnknownFormat(pub String);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-backed vacancy storage.
///
/// A store is bound to one path and holds the candidate vacancies used by
/// [`VacancyStore::save`]. Every query re-reads the file, so results always
/// reflect the last saved state rather than the candidates in memory.
pub trait VacancyStore {
    fn format(&self) -> StorageFormat;

    fn path(&self) -> &Path;

    /// Overwrites the file with the candidate vacancies.
    fn save(&self) -> Result<(), StorageError>;

    fn load(&self) -> Result<Vec<VacancyRow>, StorageError>;

    /// Rows whose `salary_from` is present, numeric and at least
    /// `min_salary`, in file order.
    fn filter_by_salary_floor(&self, min_salary: i64) -> Result<Vec<VacancyRow>, StorageError>;

    /// Rows whose city contains the title-cased `city`.
    fn filter_by_city(&self, city: &str) -> Result<Vec<VacancyRow>, StorageError> {
        Ok(query::matching_city(self.load()?, city))
    }

    /// Removes every row titled exactly `title`, rewrites the file and
    /// returns how many rows were dropped.
    fn delete(&self, title: &str) -> Result<usize, StorageError>;

    /// The first `count` rows in file order.
    fn top(&self, count: usize) -> Result<Vec<VacancyRow>, StorageError> {
        Ok(query::first(self.load()?, count))
    }
}

pub fn open_store(
    format: StorageFormat,
    path: impl Into<PathBuf>,
    candidates: Vec<Vacancy>,
) -> Box<dyn VacancyStore> {
    match format {
        StorageFormat::Json => Box::new(JsonVacancyStore::new(path, candidates)),
        StorageFormat::Csv => Box::new(CsvVacancyStore::new(path, candidates)),
    }
}

/// Picks whichever saved file exists, preferring JSON over CSV.
pub fn detect_existing(json_path: &Path, csv_path: &Path) -> Option<(StorageFormat, PathBuf)> {
    if json_path.is_file() {
        Some((StorageFormat::Json, json_path.to_path_buf()))
    } else if csv_path.is_file() {
        Some((StorageFormat::Csv, csv_path.to_path_buf()))
    } else {
        None
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| StorageError::io(path, err))
        }
        _ => Ok(()),
    }
}
