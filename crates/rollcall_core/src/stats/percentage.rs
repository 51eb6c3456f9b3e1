//! Per-student attendance percentage.
//!
//! # Invariants
//! - Only dates where the student has an explicit mark count toward the
//!   denominator, so students added later are not penalized.
//! - A student with no marks reports `NoData`, never `0%`.

use crate::model::attendance::AttendanceBook;
use crate::model::status::AttendanceStatus;
use crate::model::student::StudentId;
use std::fmt::{Display, Formatter};

/// Raw counters behind a percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub present: u32,
    pub total: u32,
}

impl AttendanceSummary {
    pub fn absent(&self) -> u32 {
        self.total - self.present
    }

    pub fn percent(&self) -> AttendancePercent {
        if self.total == 0 {
            return AttendancePercent::NoData;
        }
        // round-half-up of present / total * 100 without floats
        let present = u64::from(self.present);
        let total = u64::from(self.total);
        let rounded = (present * 200 + total) / (total * 2);
        AttendancePercent::Percent(u8::try_from(rounded).unwrap_or(100))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendancePercent {
    NoData,
    Percent(u8),
}

impl AttendancePercent {
    pub fn value(self) -> Option<u8> {
        match self {
            Self::NoData => None,
            Self::Percent(value) => Some(value),
        }
    }
}

impl Display for AttendancePercent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "-"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

/// Counts marks for `id` over every recorded date.
pub fn summary_for(book: &AttendanceBook, id: &StudentId) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for date in book.recorded_dates() {
        match book.status(date, id) {
            AttendanceStatus::Present => {
                summary.total += 1;
                summary.present += 1;
            }
            AttendanceStatus::Absent => summary.total += 1,
            AttendanceStatus::Unset => {}
        }
    }
    summary
}

pub fn percent_for(book: &AttendanceBook, id: &StudentId) -> AttendancePercent {
    summary_for(book, id).percent()
}

#[cfg(test)]
mod tests {
    use super::{percent_for, summary_for, AttendancePercent, AttendanceSummary};
    use crate::model::attendance::AttendanceBook;
    use crate::model::date_key::DateKey;
    use crate::model::status::Mark;
    use crate::model::student::StudentId;

    fn date(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn no_marks_is_no_data() {
        let mut book = AttendanceBook::new();
        book.record(&date("2024-01-01"), &StudentId::from("other"), Mark::Present);

        let percent = percent_for(&book, &StudentId::from("late"));
        assert_eq!(percent, AttendancePercent::NoData);
        assert_eq!(percent.to_string(), "-");
    }

    #[test]
    fn only_marked_dates_count() {
        let mut book = AttendanceBook::new();
        let early = StudentId::from("early");
        let late = StudentId::from("late");
        book.record(&date("2024-01-01"), &early, Mark::Present);
        book.record(&date("2024-01-02"), &early, Mark::Absent);
        book.record(&date("2024-01-02"), &late, Mark::Present);

        assert_eq!(percent_for(&book, &early), AttendancePercent::Percent(50));
        assert_eq!(percent_for(&book, &late), AttendancePercent::Percent(100));
        assert_eq!(summary_for(&book, &early).absent(), 1);
    }

    #[test]
    fn rounding_is_half_up() {
        let two_of_three = AttendanceSummary { present: 2, total: 3 };
        assert_eq!(two_of_three.percent(), AttendancePercent::Percent(67));

        let one_of_three = AttendanceSummary { present: 1, total: 3 };
        assert_eq!(one_of_three.percent(), AttendancePercent::Percent(33));

        let one_of_eight = AttendanceSummary { present: 1, total: 8 };
        assert_eq!(one_of_eight.percent(), AttendancePercent::Percent(13));
        assert_eq!(one_of_eight.percent().to_string(), "13%");
    }
}
