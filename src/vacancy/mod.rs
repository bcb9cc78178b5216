mod domain;
mod ranking;

pub use domain::{
    FieldValue, Salary, UnknownField, ValidationError, Vacancy, VacancyDraft, VacancyField,
};
pub use ranking::RankOrdering;
