use job_parser::storage::{open_store, StorageError, StorageFormat, VacancyRow, VacancyStore};
use job_parser::vacancy::{Salary, Vacancy};
use serde_json::{json, Value};
use std::path::Path;

fn vacancy(title: &str, from: Option<i64>, to: Option<i64>, city: &str) -> Vacancy {
    Vacancy::new(
        title,
        format!("https://hh.ru/vacancy/{}", title.len()),
        from.map(Salary::Whole),
        to.map(Salary::Whole),
        "Acme",
        city,
        "Rust, SQL",
    )
    .expect("valid vacancy")
}

fn sample() -> Vec<Vacancy> {
    vec![
        vacancy("Rust developer", Some(150000), Some(250000), "Москва"),
        vacancy("Python developer", Some(90000), None, "Saint Petersburg"),
        vacancy("QA engineer", None, None, "Moscow"),
        vacancy("Rust developer", Some(60000), Some(80000), "Kazan"),
        vacancy("Team lead", Some(300000), Some(400000), "Moscow Oblast"),
    ]
}

fn store_in(dir: &Path, format: StorageFormat, candidates: Vec<Vacancy>) -> Box<dyn VacancyStore> {
    let path = match format {
        StorageFormat::Json => dir.join("vacancies.json"),
        StorageFormat::Csv => dir.join("vacancies.csv"),
    };
    open_store(format, path, candidates)
}

fn titles(rows: &[VacancyRow]) -> Vec<&str> {
    rows.iter()
        .map(|row| row["title"].as_str().expect("title is text"))
        .collect()
}

/// CSV cells come back as strings, so compare by rendered text.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[test]
fn json_round_trip_preserves_native_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vacancies = sample();
    let expected: Vec<VacancyRow> = vacancies.iter().map(Vacancy::to_mapping).collect();

    let store = store_in(dir.path(), StorageFormat::Json, vacancies);
    store.save().expect("save");

    let rows = store.load().expect("load");
    assert_eq!(rows, expected);
}

#[test]
fn csv_round_trip_preserves_fields_as_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vacancies = sample();
    let expected: Vec<VacancyRow> = vacancies.iter().map(Vacancy::to_mapping).collect();

    let store = store_in(dir.path(), StorageFormat::Csv, vacancies);
    store.save().expect("save");

    let rows = store.load().expect("load");
    assert_eq!(rows.len(), expected.len());
    for (row, expected_row) in rows.iter().zip(&expected) {
        let keys: Vec<&String> = row.keys().collect();
        let expected_keys: Vec<&String> = expected_row.keys().collect();
        assert_eq!(keys, expected_keys);
        for (name, value) in expected_row {
            assert_eq!(cell(&row[name]), cell(value), "field {name} differs");
        }
    }
}

#[test]
fn salary_floor_keeps_order_and_skips_missing_bounds() {
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path(), format, sample());
        store.save().expect("save");

        let rows = store.filter_by_salary_floor(90000).expect("filter");
        assert_eq!(
            titles(&rows),
            vec!["Rust developer", "Python developer", "Team lead"],
            "{format}"
        );

        assert!(store.filter_by_salary_floor(1_000_000).expect("filter").is_empty());
    }
}

#[test]
fn city_filter_title_cases_the_query_only() {
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path(), format, sample());
        store.save().expect("save");

        let rows = store.filter_by_city("moscow").expect("filter");
        assert_eq!(titles(&rows), vec!["QA engineer", "Team lead"], "{format}");

        let rows = store.filter_by_city("москва").expect("filter");
        assert_eq!(titles(&rows), vec!["Rust developer"], "{format}");

        assert!(store.filter_by_city("Novosibirsk").expect("filter").is_empty());
    }
}

#[test]
fn delete_removes_every_exact_title_match() {
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path(), format, sample());
        store.save().expect("save");

        assert_eq!(store.delete("Rust developer").expect("delete"), 2, "{format}");
        let rows = store.load().expect("load");
        assert_eq!(
            titles(&rows),
            vec!["Python developer", "QA engineer", "Team lead"],
            "{format}"
        );
    }
}

#[test]
fn deleting_unknown_title_leaves_rows_unchanged() {
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path(), format, sample());
        store.save().expect("save");
        let before = store.load().expect("load");

        assert_eq!(store.delete("rust developer").expect("delete"), 0, "{format}");
        assert_eq!(store.load().expect("load"), before, "{format}");
    }
}

#[test]
fn top_returns_leading_rows_in_file_order() {
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path(), format, sample());
        store.save().expect("save");

        let rows = store.top(3).expect("top");
        assert_eq!(
            titles(&rows),
            vec!["Rust developer", "Python developer", "QA engineer"],
            "{format}"
        );
        assert_eq!(store.top(10).expect("top").len(), 5, "{format}");
    }
}

#[test]
fn queries_read_the_file_not_the_candidates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vacancies.json");
    std::fs::write(
        &path,
        json!([{
            "title": "Saved earlier",
            "vacancy_url": "u",
            "salary_from": 500000,
            "salary_to": null,
            "employer": "Acme",
            "city": "Perm",
            "requirements": "none"
        }])
        .to_string(),
    )
    .expect("seed file");

    let store = open_store(StorageFormat::Json, &path, sample());
    let rows = store.load().expect("load");
    assert_eq!(titles(&rows), vec!["Saved earlier"]);
    assert_eq!(titles(&store.top(5).expect("top")), vec!["Saved earlier"]);
}

#[test]
fn load_of_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let store = store_in(dir.path(), format, Vec::new());
        let err = store.load().expect_err("file does not exist");
        assert!(matches!(err, StorageError::Io { .. }), "{format}: {err:?}");
        assert!(err.to_string().starts_with("failed to access"), "{err}");
    }
}
