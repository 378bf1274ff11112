// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contributions, ledger operations and the management dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use renemico_core::error::{RenemicoError, Result};
use renemico_core::validation::{parse_month, require, validate_contribution_amount, validate_operation_amount};
use renemico_core::{Contribution, Operation, OperationForm, RecordId};
use renemico_finance::aggregate::{self, MemberSummary};
use renemico_finance::stats::{self, Dashboard};
use tracing::instrument;

use super::app_services::AppServices;
use super::membership::fetch;

impl AppServices {
    // -- Contributions -------------------------------------------------------

    /// Record one month's payment for a member. `month` is a month picker
    /// value (`2025-08`).
    #[instrument(skip(self))]
    pub fn record_contribution(
        &self,
        member_id: RecordId,
        month: &str,
        amount: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<Contribution> {
        let month = parse_month(month)?;
        let amount = validate_contribution_amount(amount)?;
        let registry = self.registry()?;
        fetch(&registry, member_id)?;
        registry.insert_contribution(member_id, month, amount, paid_at)
    }

    pub fn contribution(&self, id: RecordId) -> Result<Contribution> {
        self.registry()?
            .get_contribution(id)?
            .ok_or_else(|| RenemicoError::not_found("contribution", id))
    }

    /// A member's contributions, newest month first.
    pub fn contributions_for(&self, member_id: RecordId) -> Result<Vec<Contribution>> {
        let registry = self.registry()?;
        fetch(&registry, member_id)?;
        registry.contributions_for(member_id)
    }

    pub fn member_summary(&self, member_id: RecordId) -> Result<MemberSummary> {
        Ok(aggregate::member_summary(&self.contributions_for(member_id)?))
    }

    pub fn delete_contribution(&self, id: RecordId) -> Result<()> {
        self.registry()?.delete_contribution(id)
    }

    // -- Ledger --------------------------------------------------------------

    #[instrument(skip(self, form), fields(kind = form.kind.code()))]
    pub fn record_operation(&self, form: OperationForm) -> Result<Operation> {
        let form = OperationForm {
            motive: require("motive", &form.motive)?,
            collected_by: require("collected_by", &form.collected_by)?.to_uppercase(),
            amount: validate_operation_amount(form.amount)?,
            ..form
        };
        self.registry()?.insert_operation(&form)
    }

    pub fn operations(&self) -> Result<Vec<Operation>> {
        self.registry()?.list_operations()
    }

    pub fn delete_operation(&self, id: RecordId) -> Result<()> {
        self.registry()?.delete_operation(id)
    }

    // -- Dashboard -----------------------------------------------------------

    #[instrument(skip(self))]
    pub fn dashboard(&self, as_of: NaiveDate) -> Result<Dashboard> {
        let registry = self.registry()?;
        let members = registry.list_members()?;
        let duplicatas = registry.list_duplicatas()?;
        let contributions = registry.all_contributions()?;
        let operations = registry.list_operations()?;
        drop(registry);
        Ok(stats::dashboard(
            &members,
            &duplicatas,
            &contributions,
            &operations,
            as_of,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::membership::tests::{d, form, services};
    use chrono::TimeZone;
    use renemico_core::OperationKind;
    use rust_decimal::Decimal;

    fn at(y: i32, m: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn contributions_are_validated_and_unique_per_month() {
        let svc = services();
        let m = svc.register_member(form("mukendi"), d(2025, 6, 1)).unwrap();

        let c = svc.record_contribution(m.id, "2025-08", 50, at(2025, 8, 5)).unwrap();
        assert_eq!(c.month, d(2025, 8, 1));
        assert_eq!(svc.contribution(c.id).unwrap(), c);

        assert!(matches!(
            svc.record_contribution(m.id, "2025-08", 50, at(2025, 8, 6)),
            Err(RenemicoError::Validation(ref f)) if f.field == "month"
        ));
        assert!(matches!(
            svc.record_contribution(m.id, "2025-09", 0, at(2025, 9, 6)),
            Err(RenemicoError::Validation(ref f)) if f.field == "amount"
        ));
        assert!(matches!(
            svc.record_contribution(m.id, "août", 10, at(2025, 9, 6)),
            Err(RenemicoError::Validation(ref f)) if f.field == "month"
        ));
        assert!(matches!(
            svc.record_contribution(99, "2025-09", 10, at(2025, 9, 6)),
            Err(RenemicoError::NotFound { .. })
        ));
    }

    #[test]
    fn summary_mean_is_rounded() {
        let svc = services();
        let m = svc.register_member(form("mukendi"), d(2025, 6, 1)).unwrap();
        for (month, amount) in [("2025-06", 10), ("2025-07", 10), ("2025-08", 13)] {
            svc.record_contribution(m.id, month, amount, at(2025, 8, 5)).unwrap();
        }
        let summary = svc.member_summary(m.id).unwrap();
        assert_eq!(summary.total, 33);
        assert_eq!(summary.months_paid, 3);
        assert_eq!(summary.monthly_mean, Decimal::new(1100, 2));
    }

    #[test]
    fn operations_feed_the_dashboard() {
        let svc = services();
        let op = |kind, cents| OperationForm {
            date: d(2025, 8, 10),
            motive: " Frais ".into(),
            amount: Decimal::new(cents, 2),
            collected_by: "caissier".into(),
            kind,
        };
        let stored = svc.record_operation(op(OperationKind::Entree, 150_000)).unwrap();
        assert_eq!(stored.motive, "Frais");
        assert_eq!(stored.collected_by, "CAISSIER");
        svc.record_operation(op(OperationKind::Sortie, 40_050)).unwrap();

        assert!(matches!(
            svc.record_operation(op(OperationKind::Sortie, -5)),
            Err(RenemicoError::Validation(ref f)) if f.field == "amount"
        ));

        let dash = svc.dashboard(d(2025, 8, 17)).unwrap();
        assert_eq!(dash.balance, Decimal::new(109_950, 2));
        assert_eq!(dash.membership.total, 0);
    }
}
