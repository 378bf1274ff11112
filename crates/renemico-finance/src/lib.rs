// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RENEMICO finance: period filters, ledger totals, per-member summaries,
// month-over-month growth and membership statistics. Every function takes an
// explicit `as_of` date; nothing here reads the clock.

pub mod aggregate;
pub mod period;
pub mod stats;

pub use aggregate::{HistoryLine, LedgerTotals, MemberSummary, MonthlyGrowth};
pub use period::{DateRange, Period};
pub use stats::{ContributionOverview, Dashboard, MembershipStats};
