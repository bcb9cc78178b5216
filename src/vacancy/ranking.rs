use std::cmp::Ordering;

use super::Vacancy;

/// Compares vacancies by [`Vacancy::rank`] alone.
///
/// Rank is the salary midpoint, so `100..200` and `50..250` compare as
/// equivalent, and any vacancy with a missing bound ranks the same as one
/// with no salary at all. Structural equality is not offered on `Vacancy`
/// so this loss stays visible at call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOrdering;

impl RankOrdering {
    pub fn compare(&self, left: &Vacancy, right: &Vacancy) -> Ordering {
        left.rank().total_cmp(&right.rank())
    }

    pub fn less(&self, left: &Vacancy, right: &Vacancy) -> bool {
        self.compare(left, right) == Ordering::Less
    }

    pub fn greater(&self, left: &Vacancy, right: &Vacancy) -> bool {
        self.compare(left, right) == Ordering::Greater
    }

    pub fn less_or_equal(&self, left: &Vacancy, right: &Vacancy) -> bool {
        self.compare(left, right) != Ordering::Greater
    }

    pub fn greater_or_equal(&self, left: &Vacancy, right: &Vacancy) -> bool {
        self.compare(left, right) != Ordering::Less
    }

    pub fn equivalent(&self, left: &Vacancy, right: &Vacancy) -> bool {
        self.compare(left, right) == Ordering::Equal
    }

    /// Highest rank first. Stable, so equal ranks keep their fetch order.
    pub fn sort_descending(&self, vacancies: &mut [Vacancy]) {
        vacancies.sort_by(|left, right| self.compare(right, left));
    }
}
