// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dashboard statistics over the whole registry.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use renemico_core::{Contribution, Duplicata, Member, MemberStatus, Operation};

use crate::aggregate::{self, LedgerTotals, MonthlyGrowth};

/// Member and card counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Expiration on or after `as_of`.
    pub valid_cards: usize,
    pub expired_cards: usize,
    pub renewed_cards: usize,
    /// Members with at least one duplicata.
    pub with_duplicata: usize,
    /// Keyed by sex label.
    pub by_sex: BTreeMap<&'static str, usize>,
    /// Keyed by category label.
    pub by_category: BTreeMap<&'static str, usize>,
    /// Keyed by province label.
    pub by_province: BTreeMap<&'static str, usize>,
    pub provinces_covered: usize,
}

pub fn membership_stats(
    members: &[Member],
    duplicatas: &[Duplicata],
    as_of: NaiveDate,
) -> MembershipStats {
    let holders: HashSet<i64> = duplicatas.iter().map(|d| d.member_id).collect();
    let mut stats = MembershipStats {
        total: members.len(),
        ..MembershipStats::default()
    };

    for m in members {
        match m.status {
            MemberStatus::Active => stats.active += 1,
            MemberStatus::Inactive => stats.inactive += 1,
        }
        if m.is_expired(as_of) {
            stats.expired_cards += 1;
        } else {
            stats.valid_cards += 1;
        }
        if m.card_renewed {
            stats.renewed_cards += 1;
        }
        if holders.contains(&m.id) {
            stats.with_duplicata += 1;
        }
        *stats.by_sex.entry(m.sex.label()).or_default() += 1;
        *stats.by_category.entry(m.category.label()).or_default() += 1;
        *stats.by_province.entry(m.province.label()).or_default() += 1;
    }
    stats.provinces_covered = stats.by_province.len();
    stats
}

/// Count, total and mean of all contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContributionOverview {
    pub count: usize,
    pub total: i64,
    pub mean: Decimal,
}

pub fn contribution_overview(contributions: &[Contribution]) -> ContributionOverview {
    let total: i64 = contributions.iter().map(|c| c.amount).sum();
    ContributionOverview {
        count: contributions.len(),
        total,
        mean: aggregate::mean(Decimal::from(total), contributions.len()),
    }
}

/// Everything the management dashboards show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub membership: MembershipStats,
    pub contributions: ContributionOverview,
    pub ledger: LedgerTotals,
    pub balance: Decimal,
    pub growth: MonthlyGrowth,
}

#[instrument(skip_all, fields(members = members.len(), as_of = %as_of))]
pub fn dashboard(
    members: &[Member],
    duplicatas: &[Duplicata],
    contributions: &[Contribution],
    operations: &[Operation],
    as_of: NaiveDate,
) -> Dashboard {
    let ledger = aggregate::ledger_totals(operations);
    Dashboard {
        as_of,
        membership: membership_stats(members, duplicatas, as_of),
        contributions: contribution_overview(contributions),
        balance: ledger.balance(),
        ledger,
        growth: aggregate::monthly_growth(contributions, as_of),
    }
}
