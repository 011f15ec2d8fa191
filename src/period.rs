//! The month and year a page is about, read from `mes` and `ano` query parameters.

use std::fmt::Display;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::endpoints;

/// Dates in forms and in the backend API, e.g. "2025-03-07".
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The earliest year a page will show.
pub const MIN_YEAR: i32 = 2000;
/// The latest year a page will show.
pub const MAX_YEAR: i32 = 2100;

/// The month names in Portuguese, starting with January.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    /// The month, 1 to 12.
    pub month: u8,
    /// The year, [MIN_YEAR] to [MAX_YEAR].
    pub year: i32,
}

impl MonthYear {
    /// The month of `date`.
    pub fn of(date: Date) -> Self {
        Self {
            month: u8::from(date.month()),
            year: date.year(),
        }
    }

    /// Read the month and year from raw query values.
    ///
    /// A missing, unparsable or out of range month falls back to the month
    /// of `today`, and likewise for the year.
    pub fn from_query(month: Option<&str>, year: Option<&str>, today: Date) -> Self {
        let month = month
            .and_then(|month| month.trim().parse::<u8>().ok())
            .filter(|month| (1..=12).contains(month))
            .unwrap_or_else(|| u8::from(today.month()));

        Self {
            month,
            year: year_from_query(year, today),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }

    /// The Portuguese name of the month, e.g. "Março".
    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }

    /// The dashboard URL for this month.
    pub fn dashboard_url(self) -> String {
        format!(
            "{}?mes={}&ano={}",
            endpoints::DASHBOARD_VIEW,
            self.month,
            self.year
        )
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} de {}", self.month_name(), self.year)
    }
}

/// Read a year from a raw query value, falling back to the year of `today`
/// when it is missing, unparsable or outside [MIN_YEAR] to [MAX_YEAR].
pub fn year_from_query(year: Option<&str>, today: Date) -> i32 {
    year.and_then(|year| year.trim().parse::<i32>().ok())
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
        .unwrap_or_else(|| today.year())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{MonthYear, year_from_query};

    #[test]
    fn reads_valid_month_and_year() {
        let got = MonthYear::from_query(Some("3"), Some("2024"), date!(2025 - 07 - 15));

        assert_eq!(
            got,
            MonthYear {
                month: 3,
                year: 2024
            }
        );
    }

    #[test]
    fn invalid_values_fall_back_to_today() {
        let today = date!(2025 - 07 - 15);

        assert_eq!(
            MonthYear::from_query(Some("13"), Some("1999"), today),
            MonthYear {
                month: 7,
                year: 2025
            }
        );
        assert_eq!(
            MonthYear::from_query(Some("abc"), None, today),
            MonthYear {
                month: 7,
                year: 2025
            }
        );
        assert_eq!(
            MonthYear::from_query(Some("0"), Some("2101"), today),
            MonthYear {
                month: 7,
                year: 2025
            }
        );
    }

    #[test]
    fn month_and_year_fall_back_independently() {
        let got = MonthYear::from_query(Some("2"), Some("3000"), date!(2025 - 07 - 15));

        assert_eq!(
            got,
            MonthYear {
                month: 2,
                year: 2025
            }
        );
    }

    #[test]
    fn previous_and_next_wrap_around_the_year() {
        let january = MonthYear {
            month: 1,
            year: 2025,
        };
        let december = MonthYear {
            month: 12,
            year: 2024,
        };

        assert_eq!(january.previous(), december);
        assert_eq!(december.next(), january);
    }

    #[test]
    fn displays_portuguese_month_name() {
        let month = MonthYear {
            month: 3,
            year: 2025,
        };

        assert_eq!(month.to_string(), "Março de 2025");
        assert_eq!(month.dashboard_url(), "/dashboard?mes=3&ano=2025");
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let today = date!(2025 - 07 - 15);

        assert_eq!(year_from_query(Some("2000"), today), 2000);
        assert_eq!(year_from_query(Some("2100"), today), 2100);
        assert_eq!(year_from_query(Some("2101"), today), 2025);
    }
}
