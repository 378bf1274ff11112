// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reporting periods anchored to an explicit date.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Ledger report period, always the calendar period containing `as_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Daily,
    Monthly,
    Quarterly,
    Semester,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Daily,
        Period::Monthly,
        Period::Quarterly,
        Period::Semester,
        Period::Yearly,
    ];

    /// URL / filename token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Daily => "journalier",
            Self::Monthly => "mensuel",
            Self::Quarterly => "trimestriel",
            Self::Semester => "semestriel",
            Self::Yearly => "annuel",
        }
    }

    /// Unknown tokens yield `None`, which callers treat as "no filter".
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.token() == token)
    }

    /// Number of months in the period, `None` for a single day.
    fn months(&self) -> Option<u32> {
        match self {
            Self::Daily => None,
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Semester => Some(6),
            Self::Yearly => Some(12),
        }
    }

    /// The calendar period of this kind that contains `as_of`.
    pub fn range(&self, as_of: NaiveDate) -> DateRange {
        let Some(span) = self.months() else {
            return DateRange {
                start: as_of,
                end: as_of,
            };
        };
        let first_month = (as_of.month0() / span) * span + 1;
        let start = NaiveDate::from_ymd_opt(as_of.year(), first_month, 1).unwrap_or(as_of);
        let end = start
            .checked_add_months(Months::new(span))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate, as_of: NaiveDate) -> bool {
        self.range(as_of).contains(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn tokens_round_trip() {
        for period in Period::ALL {
            assert_eq!(Period::from_token(period.token()), Some(period));
        }
        assert_eq!(Period::from_token("Mensuel"), Some(Period::Monthly));
        assert_eq!(Period::from_token("hebdomadaire"), None);
    }

    #[test]
    fn daily_is_a_single_day() {
        let as_of = d(2025, 8, 17);
        let range = Period::Daily.range(as_of);
        assert_eq!((range.start, range.end), (as_of, as_of));
        assert!(!Period::Daily.contains(d(2025, 8, 16), as_of));
    }

    #[test]
    fn calendar_periods() {
        let as_of = d(2025, 8, 17);
        let monthly = Period::Monthly.range(as_of);
        assert_eq!((monthly.start, monthly.end), (d(2025, 8, 1), d(2025, 8, 31)));

        let quarter = Period::Quarterly.range(as_of);
        assert_eq!((quarter.start, quarter.end), (d(2025, 7, 1), d(2025, 9, 30)));

        let semester = Period::Semester.range(as_of);
        assert_eq!((semester.start, semester.end), (d(2025, 7, 1), d(2025, 12, 31)));

        let year = Period::Yearly.range(as_of);
        assert_eq!((year.start, year.end), (d(2025, 1, 1), d(2025, 12, 31)));
    }

    #[test]
    fn february_month_end() {
        let range = Period::Monthly.range(d(2024, 2, 10));
        assert_eq!(range.end, d(2024, 2, 29));
        let first_quarter = Period::Quarterly.range(d(2025, 3, 31));
        assert_eq!(first_quarter.start, d(2025, 1, 1));
    }
}
