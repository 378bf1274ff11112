// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sums, means and growth over contributions and ledger operations.
//
// Empty inputs always aggregate to zero.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use renemico_core::types::first_of_month;
use renemico_core::{Contribution, Member, Operation, OperationKind};

use crate::period::Period;

/// A member's contribution history at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub total: i64,
    pub months_paid: usize,
    /// Mean per paid month, two decimal places.
    pub monthly_mean: Decimal,
}

pub fn member_summary(contributions: &[Contribution]) -> MemberSummary {
    let total: i64 = contributions.iter().map(|c| c.amount).sum();
    let months_paid = contributions.len();
    MemberSummary {
        total,
        months_paid,
        monthly_mean: mean(Decimal::from(total), months_paid),
    }
}

pub(crate) fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

/// Inflow and outflow of a set of ledger operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub inflow: Decimal,
    pub outflow: Decimal,
}

impl LedgerTotals {
    pub fn balance(&self) -> Decimal {
        self.inflow - self.outflow
    }
}

pub fn ledger_totals<'a>(operations: impl IntoIterator<Item = &'a Operation>) -> LedgerTotals {
    operations
        .into_iter()
        .fold(LedgerTotals::default(), |mut acc, op| {
            match op.kind {
                OperationKind::Entree => acc.inflow += op.amount,
                OperationKind::Sortie => acc.outflow += op.amount,
            }
            acc
        })
}

/// Operations inside `period` (all of them when `None`), newest first.
pub fn operations_in(
    operations: &[Operation],
    period: Option<Period>,
    as_of: NaiveDate,
) -> Vec<&Operation> {
    let range = period.map(|p| p.range(as_of));
    let mut selected: Vec<&Operation> = operations
        .iter()
        .filter(|op| range.is_none_or(|r| r.contains(op.date)))
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    debug!(
        period = period.map(|p| p.token()).unwrap_or("tout"),
        kept = selected.len(),
        total = operations.len(),
        "filtered ledger operations"
    );
    selected
}

/// `(this - last) / last * 100`, two decimal places; zero when `last` is zero.
pub fn growth_rate(this: Decimal, last: Decimal) -> Decimal {
    if last.is_zero() {
        return Decimal::ZERO;
    }
    ((this - last) / last * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Contribution totals of the current and previous calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyGrowth {
    pub this_month: i64,
    pub last_month: i64,
    /// Percentage, two decimal places.
    pub rate: Decimal,
}

/// Month-over-month growth, bucketed by payment timestamp.
///
/// "This month" runs from the first of `as_of`'s month up to `as_of`
/// inclusive; "last month" is the whole previous calendar month.
pub fn monthly_growth(contributions: &[Contribution], as_of: NaiveDate) -> MonthlyGrowth {
    let this_start = first_of_month(as_of);
    let last_start = this_start
        .checked_sub_months(Months::new(1))
        .unwrap_or(this_start);

    let (mut this_month, mut last_month) = (0i64, 0i64);
    for c in contributions {
        let paid = c.paid_at.date_naive();
        if this_start <= paid && paid <= as_of {
            this_month += c.amount;
        } else if last_start <= paid && paid < this_start {
            last_month += c.amount;
        }
    }

    MonthlyGrowth {
        this_month,
        last_month,
        rate: growth_rate(Decimal::from(this_month), Decimal::from(last_month)),
    }
}

/// A member's contributions, most recent month first.
pub fn history_desc(contributions: &[Contribution]) -> Vec<&Contribution> {
    let mut sorted: Vec<&Contribution> = contributions.iter().collect();
    sorted.sort_by(|a, b| b.month.cmp(&a.month).then(b.id.cmp(&a.id)));
    sorted
}

/// One line of the all-members history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryLine<'a> {
    pub member: &'a Member,
    pub contribution: &'a Contribution,
}

/// Every contribution joined to its member, ordered by member last name,
/// then most recent month first. Contributions of unknown members are
/// skipped.
pub fn all_members_history<'a>(
    members: &'a [Member],
    contributions: &'a [Contribution],
) -> Vec<HistoryLine<'a>> {
    let by_id: HashMap<i64, &Member> = members.iter().map(|m| (m.id, m)).collect();
    let mut lines: Vec<HistoryLine<'a>> = contributions
        .iter()
        .filter_map(|c| {
            by_id.get(&c.member_id).map(|m| HistoryLine {
                member: m,
                contribution: c,
            })
        })
        .collect();
    lines.sort_by(|a, b| {
        a.member
            .nom
            .cmp(&b.member.nom)
            .then(a.member.id.cmp(&b.member.id))
            .then(b.contribution.month.cmp(&a.contribution.month))
    });
    if lines.len() < contributions.len() {
        debug!(
            skipped = contributions.len() - lines.len(),
            "contributions without a known member"
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn contribution(id: i64, amount: i64, paid: NaiveDate) -> Contribution {
        Contribution {
            id,
            member_id: 1,
            month: first_of_month(paid),
            amount,
            paid_at: Utc.from_utc_datetime(&paid.and_hms_opt(10, 0, 0).unwrap()),
        }
    }

    fn operation(id: i64, date: NaiveDate, cents: i64, kind: OperationKind) -> Operation {
        Operation {
            id,
            date,
            motive: format!("op {id}"),
            amount: Decimal::new(cents, 2),
            collected_by: "Caisse".into(),
            kind,
        }
    }

    #[test]
    fn empty_inputs_aggregate_to_zero() {
        let summary = member_summary(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.monthly_mean, Decimal::ZERO);

        let totals = ledger_totals(&[]);
        assert_eq!(totals.balance(), Decimal::ZERO);

        let growth = monthly_growth(&[], d(2025, 8, 15));
        assert_eq!(growth.rate, Decimal::ZERO);
    }

    #[test]
    fn member_summary_mean_is_rounded() {
        let list = vec![
            contribution(1, 50, d(2025, 6, 2)),
            contribution(2, 60, d(2025, 7, 2)),
            contribution(3, 70, d(2025, 8, 2)),
            contribution(4, 10, d(2025, 9, 2)),
        ];
        let summary = member_summary(&list[..3]);
        assert_eq!(summary.total, 180);
        assert_eq!(summary.monthly_mean, Decimal::new(60, 0));

        let uneven = member_summary(&[list[0].clone(), list[1].clone(), list[3].clone()]);
        assert_eq!(uneven.monthly_mean, Decimal::new(4000, 2));
        let thirds = member_summary(&[list[0].clone(), list[3].clone(), contribution(5, 40, d(2025, 10, 2))]);
        assert_eq!(thirds.monthly_mean, Decimal::new(3333, 2));
    }

    #[test]
    fn ledger_balance() {
        let ops = vec![
            operation(1, d(2025, 8, 1), 100_000, OperationKind::Entree),
            operation(2, d(2025, 8, 2), 25_050, OperationKind::Sortie),
            operation(3, d(2025, 8, 3), 5_000, OperationKind::Entree),
        ];
        let totals = ledger_totals(&ops);
        assert_eq!(totals.inflow, Decimal::new(105_000, 2));
        assert_eq!(totals.outflow, Decimal::new(25_050, 2));
        assert_eq!(totals.balance(), Decimal::new(79_950, 2));
    }

    #[test]
    fn daily_filter_keeps_only_today() {
        let as_of = d(2025, 8, 17);
        let ops = vec![
            operation(1, d(2025, 8, 16), 1_000, OperationKind::Entree),
            operation(2, as_of, 2_000, OperationKind::Entree),
            operation(3, d(2025, 8, 18), 3_000, OperationKind::Sortie),
            operation(4, as_of, 4_000, OperationKind::Sortie),
        ];
        let today: Vec<i64> = operations_in(&ops, Some(Period::Daily), as_of)
            .iter()
            .map(|op| op.id)
            .collect();
        assert_eq!(today, vec![4, 2]);
        assert_eq!(operations_in(&ops, None, as_of).len(), 4);
    }

    #[test]
    fn growth_rate_rules() {
        assert_eq!(growth_rate(Decimal::new(150, 0), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(growth_rate(Decimal::new(150, 0), Decimal::new(100, 0)), Decimal::new(50, 0));
        assert_eq!(growth_rate(Decimal::new(50, 0), Decimal::new(150, 0)), Decimal::new(-6667, 2));
    }

    #[test]
    fn monthly_growth_buckets_by_payment_date() {
        let as_of = d(2025, 8, 15);
        let list = vec![
            contribution(1, 100, d(2025, 7, 1)),
            contribution(2, 100, d(2025, 7, 31)),
            contribution(3, 300, d(2025, 8, 1)),
            contribution(4, 999, d(2025, 8, 20)),
            contribution(5, 999, d(2025, 6, 30)),
        ];
        let growth = monthly_growth(&list, as_of);
        assert_eq!(growth.this_month, 300);
        assert_eq!(growth.last_month, 200);
        assert_eq!(growth.rate, Decimal::new(50, 0));
    }

    #[test]
    fn growth_is_zero_without_last_month() {
        let growth = monthly_growth(&[contribution(1, 80, d(2025, 8, 2))], d(2025, 8, 15));
        assert_eq!(growth.this_month, 80);
        assert_eq!(growth.rate, Decimal::ZERO);
    }

    fn member(id: i64, nom: &str) -> Member {
        use renemico_core::{Category, Province, Sex};
        Member {
            id,
            code: format!("M{id}"),
            province: Province::Lualaba,
            category: Category::Effective,
            function: None,
            site: None,
            nom: nom.into(),
            post_nom: "P".into(),
            prenom: "Q".into(),
            sex: Sex::Female,
            birth_date: d(1990, 1, 1),
            birth_place: "KOLWEZI".into(),
            address: None,
            phone: None,
            email: None,
            photo: None,
            qrcode: None,
            registered_on: d(2024, 1, 1),
            updated_on: d(2024, 1, 1),
            expires_on: d(2027, 1, 1),
            status: renemico_core::MemberStatus::Active,
            profession: None,
            observations: None,
            card_renewed: false,
        }
    }

    #[test]
    fn history_is_newest_month_first() {
        let list = vec![
            contribution(1, 50, d(2025, 6, 2)),
            contribution(2, 70, d(2025, 8, 2)),
            contribution(3, 60, d(2025, 7, 2)),
        ];
        let ids: Vec<i64> = history_desc(&list).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn all_members_history_orders_by_name_then_month() {
        let members = vec![member(1, "MWAMBA"), member(2, "KABILA")];
        let mut list = vec![
            contribution(1, 50, d(2025, 6, 2)),
            contribution(2, 60, d(2025, 7, 2)),
            contribution(3, 70, d(2025, 6, 2)),
            contribution(4, 80, d(2025, 6, 2)),
        ];
        list[2].member_id = 2;
        list[3].member_id = 99;

        let lines = all_members_history(&members, &list);
        let ids: Vec<i64> = lines.iter().map(|l| l.contribution.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(lines[0].member.nom, "KABILA");
    }
}
