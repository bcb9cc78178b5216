use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use super::{ensure_parent, query, StorageError, StorageFormat, VacancyRow, VacancyStore};
use crate::vacancy::{FieldValue, Vacancy, VacancyField};

/// Stores vacancies as CSV with a fixed seven-column header.
#[derive(Debug, Clone)]
pub struct CsvVacancyStore {
    path: PathBuf,
    candidates: Vec<Vacancy>,
}

impl CsvVacancyStore {
    pub fn new(path: impl Into<PathBuf>, candidates: Vec<Vacancy>) -> Self {
        Self {
            path: path.into(),
            candidates,
        }
    }

    /// Rewrites the file with the header followed by `records`, even when
    /// there are none.
    fn write_records<I>(&self, records: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        ensure_parent(&self.path)?;
        let file = File::create(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record(VacancyField::ALL.map(VacancyField::name))
            .map_err(|err| StorageError::csv(&self.path, err))?;
        for record in records {
            writer
                .write_record(&record)
                .map_err(|err| StorageError::csv(&self.path, err))?;
        }

        writer
            .flush()
            .map_err(|err| StorageError::io(&self.path, err))
    }
}

impl VacancyStore for CsvVacancyStore {
    fn format(&self) -> StorageFormat {
        StorageFormat::Csv
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StorageError> {
        let records = self.candidates.iter().map(|vacancy| {
            VacancyField::ALL
                .iter()
                .map(|field| field_cell(vacancy.field(*field)))
                .collect::<Vec<String>>()
        });
        self.write_records(records)?;
        info!(path = %self.path.display(), count = self.candidates.len(), "vacancies saved as CSV");
        Ok(())
    }

    fn load(&self) -> Result<Vec<VacancyRow>, StorageError> {
        let file = File::open(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader
            .headers()
            .map_err(|err| StorageError::csv(&self.path, err))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| StorageError::csv(&self.path, err))?;
            let row: VacancyRow = headers
                .iter()
                .zip(record.iter())
                .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
                .collect();
            rows.push(row);
        }

        debug!(path = %self.path.display(), count = rows.len(), "CSV vacancies loaded");
        Ok(rows)
    }

    fn filter_by_salary_floor(&self, min_salary: i64) -> Result<Vec<VacancyRow>, StorageError> {
        Ok(query::salary_at_least(self.load()?, min_salary, numeric_cell))
    }

    fn delete(&self, title: &str) -> Result<usize, StorageError> {
        let (remaining, removed) = query::without_title(self.load()?, title);
        let records = remaining.iter().map(|row| {
            VacancyField::ALL
                .iter()
                .map(|field| row.get(field.name()).map(value_cell).unwrap_or_default())
                .collect::<Vec<String>>()
        });
        self.write_records(records)?;
        info!(path = %self.path.display(), title, removed, "vacancies deleted from CSV");
        Ok(removed)
    }
}

fn field_cell(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Text(text) => text.to_string(),
        FieldValue::Salary(Some(salary)) => salary.to_string(),
        FieldValue::Salary(None) => String::new(),
    }
}

fn value_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// CSV cells are untyped; a salary counts only if it parses as a finite
/// number. Empty and non-numeric cells are skipped.
fn numeric_cell(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|cell| cell.trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
}
