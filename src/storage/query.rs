use serde_json::Value;

use super::VacancyRow;
use crate::vacancy::VacancyField;

/// Capitalizes the first letter of every alphabetic run and lowercases the
/// rest, so `saint-petersburg` becomes `Saint-Petersburg`.
pub(crate) fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_alphabetic = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alphabetic {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            result.push(ch);
            previous_alphabetic = false;
        }
    }

    result
}

fn text<'a>(row: &'a VacancyRow, field: VacancyField) -> Option<&'a str> {
    row.get(field.name()).and_then(Value::as_str)
}

/// Rows whose stored city contains the title-cased query. The stored side
/// is not normalized, so `moscow` finds `Moscow` but not `MOSCOW`.
pub(crate) fn matching_city(rows: Vec<VacancyRow>, city: &str) -> Vec<VacancyRow> {
    let needle = title_case(city);
    rows.into_iter()
        .filter(|row| {
            text(row, VacancyField::City).is_some_and(|stored| stored.contains(&needle))
        })
        .collect()
}

/// Rows whose `salary_from`, as read by `salary_from`, is at least `floor`.
pub(crate) fn salary_at_least<F>(
    rows: Vec<VacancyRow>,
    floor: i64,
    salary_from: F,
) -> Vec<VacancyRow>
where
    F: Fn(&Value) -> Option<f64>,
{
    let floor = floor as f64;
    rows.into_iter()
        .filter(|row| {
            row.get(VacancyField::SalaryFrom.name())
                .and_then(&salary_from)
                .is_some_and(|amount| amount >= floor)
        })
        .collect()
}

/// Drops every row whose title equals `title` exactly and returns the
/// remainder with the number of rows removed.
pub(crate) fn without_title(rows: Vec<VacancyRow>, title: &str) -> (Vec<VacancyRow>, usize) {
    let before = rows.len();
    let remaining: Vec<VacancyRow> = rows
        .into_iter()
        .filter(|row| text(row, VacancyField::Title) != Some(title))
        .collect();
    let removed = before - remaining.len();
    (remaining, removed)
}

pub(crate) fn first(mut rows: Vec<VacancyRow>, count: usize) -> Vec<VacancyRow> {
    rows.truncate(count);
    rows
}
