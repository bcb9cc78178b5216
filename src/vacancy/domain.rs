use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::storage::VacancyRow;

/// Salary bound as reported by a platform. Whole amounts stay whole so files
/// reproduce `100000` rather than `100000.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Salary {
    Whole(i64),
    Fractional(f64),
}

impl Salary {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Whole(value) => value as f64,
            Self::Fractional(value) => value,
        }
    }

    fn from_number(number: &Number) -> Option<Self> {
        if let Some(value) = number.as_i64() {
            return Some(Self::Whole(value));
        }
        number.as_f64().map(Self::Fractional)
    }

    fn to_value(self) -> Value {
        match self {
            Self::Whole(value) => Value::from(value),
            Self::Fractional(value) => Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl From<i64> for Salary {
    fn from(value: i64) -> Self {
        Self::Whole(value)
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(value) => write!(f, "{value}"),
            // Debug keeps the `.0` that JSON writes for integral floats.
            Self::Fractional(value) => write!(f, "{value:?}"),
        }
    }
}

/// The closed set of fields every stored vacancy carries, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VacancyField {
    Title,
    VacancyUrl,
    SalaryFrom,
    SalaryTo,
    Employer,
    City,
    Requirements,
}

impl VacancyField {
    pub const ALL: [Self; 7] = [
        Self::Title,
        Self::VacancyUrl,
        Self::SalaryFrom,
        Self::SalaryTo,
        Self::Employer,
        Self::City,
        Self::Requirements,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::VacancyUrl => "vacancy_url",
            Self::SalaryFrom => "salary_from",
            Self::SalaryTo => "salary_to",
            Self::Employer => "employer",
            Self::City => "city",
            Self::Requirements => "requirements",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::VacancyUrl => "vacancy URL",
            Self::SalaryFrom => "salary from",
            Self::SalaryTo => "salary to",
            Self::Employer => "employer",
            Self::City => "city",
            Self::Requirements => "requirements",
        }
    }
}

impl FromStr for VacancyField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

impl fmt::Display for VacancyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid key for Vacancy")]
pub struct UnknownField(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must be a non-empty string")]
    EmptyTitle,
    #[error("{field} must be a string, got {found}")]
    NotText {
        field: VacancyField,
        found: &'static str,
    },
    #[error("{field} must be numeric or null, got {found}")]
    NotNumeric {
        field: VacancyField,
        found: &'static str,
    },
}

/// Borrowed view of a single vacancy field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Salary(Option<Salary>),
}

impl FieldValue<'_> {
    pub fn to_value(self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.to_string()),
            FieldValue::Salary(Some(salary)) => salary.to_value(),
            FieldValue::Salary(None) => Value::Null,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Salary(Some(salary)) => write!(f, "{salary}"),
            FieldValue::Salary(None) => f.write_str("None"),
        }
    }
}

/// Untyped field values lifted straight out of a platform payload, before
/// any type checking.
#[derive(Debug, Clone, Default)]
pub struct VacancyDraft {
    pub title: Value,
    pub vacancy_url: Value,
    pub salary_from: Value,
    pub salary_to: Value,
    pub employer: Value,
    pub city: Value,
    pub requirements: Value,
}

/// Normalized job listing. Fields are fixed at construction; `rank` is the
/// salary midpoint when both bounds are known and `0` otherwise.
#[derive(Debug, Clone)]
pub struct Vacancy {
    title: String,
    vacancy_url: String,
    salary_from: Option<Salary>,
    salary_to: Option<Salary>,
    employer: String,
    city: String,
    requirements: String,
    rank: f64,
}

impl Vacancy {
    pub fn new(
        title: impl Into<String>,
        vacancy_url: impl Into<String>,
        salary_from: Option<Salary>,
        salary_to: Option<Salary>,
        employer: impl Into<String>,
        city: impl Into<String>,
        requirements: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let rank = match (salary_from, salary_to) {
            (Some(from), Some(to)) => (from.as_f64() + to.as_f64()) / 2.0,
            _ => 0.0,
        };

        Ok(Self {
            title,
            vacancy_url: vacancy_url.into(),
            salary_from,
            salary_to,
            employer: employer.into(),
            city: city.into(),
            requirements: requirements.into(),
            rank,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn vacancy_url(&self) -> &str {
        &self.vacancy_url
    }

    pub fn salary_from(&self) -> Option<Salary> {
        self.salary_from
    }

    pub fn salary_to(&self) -> Option<Salary> {
        self.salary_to
    }

    pub fn employer(&self) -> &str {
        &self.employer
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    /// Ordering key. Distinct salary pairs with the same midpoint collapse to
    /// the same rank; see [`super::RankOrdering`].
    pub fn rank(&self) -> f64 {
        self.rank
    }

    pub fn field(&self, field: VacancyField) -> FieldValue<'_> {
        match field {
            VacancyField::Title => FieldValue::Text(&self.title),
            VacancyField::VacancyUrl => FieldValue::Text(&self.vacancy_url),
            VacancyField::SalaryFrom => FieldValue::Salary(self.salary_from),
            VacancyField::SalaryTo => FieldValue::Salary(self.salary_to),
            VacancyField::Employer => FieldValue::Text(&self.employer),
            VacancyField::City => FieldValue::Text(&self.city),
            VacancyField::Requirements => FieldValue::Text(&self.requirements),
        }
    }

    pub fn get(&self, key: &str) -> Result<FieldValue<'_>, UnknownField> {
        key.parse::<VacancyField>().map(|field| self.field(field))
    }

    pub fn to_mapping(&self) -> VacancyRow {
        let mut row = Map::with_capacity(VacancyField::ALL.len());
        for field in VacancyField::ALL {
            row.insert(field.name().to_string(), self.field(field).to_value());
        }
        row
    }
}

impl TryFrom<VacancyDraft> for Vacancy {
    type Error = ValidationError;

    fn try_from(draft: VacancyDraft) -> Result<Self, Self::Error> {
        let title = expect_text(VacancyField::Title, draft.title)?;
        let vacancy_url = expect_text(VacancyField::VacancyUrl, draft.vacancy_url)?;
        let salary_from = expect_salary(VacancyField::SalaryFrom, &draft.salary_from)?;
        let salary_to = expect_salary(VacancyField::SalaryTo, &draft.salary_to)?;
        let employer = expect_text(VacancyField::Employer, draft.employer)?;
        let city = expect_text(VacancyField::City, draft.city)?;
        let requirements = expect_text(VacancyField::Requirements, draft.requirements)?;

        Self::new(
            title,
            vacancy_url,
            salary_from,
            salary_to,
            employer,
            city,
            requirements,
        )
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in VacancyField::ALL {
            writeln!(f, "{}: {}", field.label(), self.field(field))?;
        }
        Ok(())
    }
}

fn expect_text(field: VacancyField, value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(ValidationError::NotText {
            field,
            found: json_kind(&other),
        }),
    }
}

fn expect_salary(field: VacancyField, value: &Value) -> Result<Option<Salary>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Salary::from_number(number).map(Some).ok_or(
            ValidationError::NotNumeric {
                field,
                found: "number",
            },
        ),
        other => Err(ValidationError::NotNumeric {
            field,
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
