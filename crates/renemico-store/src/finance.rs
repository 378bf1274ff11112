// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contributions, ledger operations and duplicatas.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

use renemico_core::error::{RenemicoError, Result};
use renemico_core::{Contribution, Duplicata, Operation, OperationForm, OperationKind, RecordId};

use crate::codec::{coded, date, date_to_sql, decimal, instant, instant_to_sql};
use crate::registry::{Registry, db};

impl Registry {
    // -- Contributions --------------------------------------------------------

    /// Record one month's payment. A second payment for the same member and
    /// month is rejected.
    #[instrument(skip(self), fields(month = %month))]
    pub fn insert_contribution(
        &self,
        member_id: RecordId,
        month: NaiveDate,
        amount: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<Contribution> {
        self.conn
            .execute(
                "INSERT INTO contributions (member_id, month, amount, paid_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![member_id, date_to_sql(month), amount, instant_to_sql(paid_at)],
            )
            .map_err(db("insert contribution"))?;

        let id = self.conn.last_insert_rowid();
        info!(contribution_id = id, "contribution recorded");
        Ok(Contribution {
            id,
            member_id,
            month,
            amount,
            paid_at,
        })
    }

    #[instrument(skip(self))]
    pub fn get_contribution(&self, id: RecordId) -> Result<Option<Contribution>> {
        self.conn
            .query_row(
                "SELECT id, member_id, month, amount, paid_at FROM contributions WHERE id = ?1",
                params![id],
                row_to_contribution,
            )
            .optional()
            .map_err(db("get contribution"))
    }

    /// One member's contributions, newest month first.
    #[instrument(skip(self))]
    pub fn contributions_for(&self, member_id: RecordId) -> Result<Vec<Contribution>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, member_id, month, amount, paid_at FROM contributions
                 WHERE member_id = ?1 ORDER BY month DESC, id DESC",
            )
            .map_err(db("prepare contributions_for"))?;
        let rows = stmt
            .query_map(params![member_id], row_to_contribution)
            .map_err(db("query contributions_for"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect contributions"))?;
        debug!(count = rows.len(), "retrieved member contributions");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub fn all_contributions(&self) -> Result<Vec<Contribution>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, member_id, month, amount, paid_at FROM contributions
                 ORDER BY paid_at DESC, id DESC",
            )
            .map_err(db("prepare all_contributions"))?;
        let rows = stmt
            .query_map([], row_to_contribution)
            .map_err(db("query all_contributions"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect contributions"))?;
        debug!(count = rows.len(), "retrieved all contributions");
        Ok(rows)
    }

    pub fn delete_contribution(&self, id: RecordId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM contributions WHERE id = ?1", params![id])
            .map_err(db("delete contribution"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("contribution", id));
        }
        Ok(())
    }

    // -- Ledger operations ----------------------------------------------------

    #[instrument(skip(self, form), fields(kind = form.kind.code()))]
    pub fn insert_operation(&self, form: &OperationForm) -> Result<Operation> {
        self.conn
            .execute(
                "INSERT INTO operations (date, motive, amount, collected_by, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    date_to_sql(form.date),
                    form.motive,
                    form.amount.to_string(),
                    form.collected_by,
                    form.kind.code(),
                ],
            )
            .map_err(db("insert operation"))?;

        let id = self.conn.last_insert_rowid();
        info!(operation_id = id, amount = %form.amount, "operation recorded");
        Ok(Operation {
            id,
            date: form.date,
            motive: form.motive.clone(),
            amount: form.amount,
            collected_by: form.collected_by.clone(),
            kind: form.kind,
        })
    }

    /// Every operation, newest first.
    #[instrument(skip(self))]
    pub fn list_operations(&self) -> Result<Vec<Operation>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, date, motive, amount, collected_by, kind FROM operations
                 ORDER BY date DESC, id DESC",
            )
            .map_err(db("prepare list operations"))?;
        let rows = stmt
            .query_map([], row_to_operation)
            .map_err(db("query list operations"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect operations"))?;
        debug!(count = rows.len(), "retrieved operations");
        Ok(rows)
    }

    pub fn delete_operation(&self, id: RecordId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM operations WHERE id = ?1", params![id])
            .map_err(db("delete operation"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("operation", id));
        }
        Ok(())
    }

    // -- Duplicatas -----------------------------------------------------------

    #[instrument(skip(self))]
    pub fn insert_duplicata(
        &self,
        member_id: RecordId,
        card_number: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Duplicata> {
        self.conn
            .execute(
                "INSERT INTO duplicatas (member_id, created_at, card_number) VALUES (?1, ?2, ?3)",
                params![member_id, instant_to_sql(created_at), card_number],
            )
            .map_err(db("insert duplicata"))?;

        let id = self.conn.last_insert_rowid();
        info!(duplicata_id = id, "duplicata recorded");
        Ok(Duplicata {
            id,
            member_id,
            created_at,
            card_number: card_number.to_string(),
        })
    }

    /// Every duplicata, most recent first.
    #[instrument(skip(self))]
    pub fn list_duplicatas(&self) -> Result<Vec<Duplicata>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, member_id, created_at, card_number FROM duplicatas
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(db("prepare list duplicatas"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Duplicata {
                    id: row.get(0)?,
                    member_id: row.get(1)?,
                    created_at: instant(row, 2)?,
                    card_number: row.get(3)?,
                })
            })
            .map_err(db("query list duplicatas"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect duplicatas"))?;
        Ok(rows)
    }
}

fn row_to_contribution(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contribution> {
    Ok(Contribution {
        id: row.get(0)?,
        member_id: row.get(1)?,
        month: date(row, 2)?,
        amount: row.get(3)?,
        paid_at: instant(row, 4)?,
    })
}

fn row_to_operation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Operation> {
    Ok(Operation {
        id: row.get(0)?,
        date: date(row, 1)?,
        motive: row.get(2)?,
        amount: decimal(row, 3)?,
        collected_by: row.get(4)?,
        kind: coded(row, 5, OperationKind::from_code)?,
    })
}
