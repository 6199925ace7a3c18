//! Calendar windows for period scoping and comparisons

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{BudgetPeriod, Transaction};

/// Length of an analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// ISO week, Monday through Sunday
    Week,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
    /// Every transaction, no bounds
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl From<BudgetPeriod> for Period {
    fn from(period: BudgetPeriod) -> Self {
        match period {
            BudgetPeriod::Weekly => Self::Week,
            BudgetPeriod::Monthly => Self::Month,
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" => Ok(Self::Year),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive date range of one [`Period`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// The window of `period` that contains `today`
    pub fn current(period: Period, today: NaiveDate) -> Self {
        let (start, end) = match period {
            Period::Week => {
                let start =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(6))
            }
            Period::Month => month_bounds(today.year(), today.month()),
            Period::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
            ),
            Period::All => (NaiveDate::MIN, NaiveDate::MAX),
        };
        Self { period, start, end }
    }

    /// The window of the same type immediately before this one
    ///
    /// `All` has no predecessor and returns itself.
    pub fn previous(&self) -> Self {
        match self.period {
            Period::All => *self,
            _ => Self::current(self.period, self.start - Duration::days(1)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Transactions dated inside the window, input order preserved
    pub fn filter<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.date))
            .collect()
    }
}

/// First and last day of a calendar month
fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first
        .map(|d| d - Duration::days(1))
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_window() {
        let w = Window::current(Period::Month, d(2024, 2, 14));
        assert_eq!(w.start, d(2024, 2, 1));
        assert_eq!(w.end, d(2024, 2, 29));

        let prev = w.previous();
        assert_eq!(prev.start, d(2024, 1, 1));
        assert_eq!(prev.end, d(2024, 1, 31));
    }

    #[test]
    fn test_month_window_wraps_year() {
        let w = Window::current(Period::Month, d(2024, 1, 3)).previous();
        assert_eq!(w.start, d(2023, 12, 1));
        assert_eq!(w.end, d(2023, 12, 31));
    }

    #[test]
    fn test_week_window_starts_monday() {
        // 2024-01-17 is a Wednesday
        let w = Window::current(Period::Week, d(2024, 1, 17));
        assert_eq!(w.start, d(2024, 1, 15));
        assert_eq!(w.end, d(2024, 1, 21));
        assert_eq!(w.previous().start, d(2024, 1, 8));

        // Sunday belongs to the week that started the previous Monday
        let sunday = Window::current(Period::Week, d(2024, 1, 21));
        assert_eq!(sunday.start, d(2024, 1, 15));
    }

    #[test]
    fn test_year_and_all() {
        let y = Window::current(Period::Year, d(2024, 6, 1));
        assert!(y.contains(d(2024, 12, 31)));
        assert!(!y.contains(d(2025, 1, 1)));
        assert_eq!(y.previous().start, d(2023, 1, 1));

        let all = Window::current(Period::All, d(2024, 6, 1));
        assert!(all.contains(d(1990, 1, 1)));
        assert_eq!(all.previous(), all);
    }

    #[test]
    fn test_period_from_budget_period() {
        assert_eq!(Period::from(BudgetPeriod::Weekly), Period::Week);
        assert_eq!("monthly".parse::<Period>().unwrap(), Period::Month);
    }
}
