use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, info};

use super::{ensure_parent, query, StorageError, StorageFormat, VacancyRow, VacancyStore};
use crate::vacancy::Vacancy;

/// Stores vacancies as a pretty-printed JSON array of objects.
#[derive(Debug, Clone)]
pub struct JsonVacancyStore {
    path: PathBuf,
    candidates: Vec<Vacancy>,
}

impl JsonVacancyStore {
    pub fn new(path: impl Into<PathBuf>, candidates: Vec<Vacancy>) -> Self {
        Self {
            path: path.into(),
            candidates,
        }
    }

    fn write_rows(&self, rows: &[VacancyRow]) -> Result<(), StorageError> {
        ensure_parent(&self.path)?;
        let file = File::create(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let mut writer = BufWriter::new(file);

        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        rows.serialize(&mut serializer)
            .map_err(|err| StorageError::json(&self.path, err))?;

        writer
            .flush()
            .map_err(|err| StorageError::io(&self.path, err))
    }
}

impl VacancyStore for JsonVacancyStore {
    fn format(&self) -> StorageFormat {
        StorageFormat::Json
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StorageError> {
        let rows: Vec<VacancyRow> = self.candidates.iter().map(Vacancy::to_mapping).collect();
        self.write_rows(&rows)?;
        info!(path = %self.path.display(), count = rows.len(), "vacancies saved as JSON");
        Ok(())
    }

    fn load(&self) -> Result<Vec<VacancyRow>, StorageError> {
        let file = File::open(&self.path).map_err(|err| StorageError::io(&self.path, err))?;
        let rows: Vec<VacancyRow> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| StorageError::json(&self.path, err))?;
        debug!(path = %self.path.display(), count = rows.len(), "JSON vacancies loaded");
        Ok(rows)
    }

    fn filter_by_salary_floor(&self, min_salary: i64) -> Result<Vec<VacancyRow>, StorageError> {
        Ok(query::salary_at_least(self.load()?, min_salary, Value::as_f64))
    }

    fn delete(&self, title: &str) -> Result<usize, StorageError> {
        let (remaining, removed) = query::without_title(self.load()?, title);
        self.write_rows(&remaining)?;
        info!(path = %self.path.display(), title, removed, "vacancies deleted from JSON");
        Ok(removed)
    }
}
