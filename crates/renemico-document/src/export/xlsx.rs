// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-sheet XLSX workbooks: members, operations and contribution
// histories.

use renemico_core::error::{RenemicoError, Result};
use renemico_core::{Contribution, Member, MemberStatus, Operation};
use renemico_finance::aggregate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::{debug, instrument};

use crate::format::{file_component, month_year, short_date};

pub const MEMBERS_FILENAME: &str = "membres.xlsx";
pub const OPERATIONS_FILENAME: &str = "operations.xlsx";
pub const ALL_HISTORY_FILENAME: &str = "Historique_Tous_Membres.xlsx";

/// Longest sheet name a workbook accepts.
const SHEET_NAME_MAX: usize = 31;
const FLAT_WIDTH: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn money(amount: Decimal) -> Self {
        Self::Number(amount.to_f64().unwrap_or_default())
    }

    /// Length of the value as displayed, used for auto column widths.
    fn display_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Number(n) => n.to_string().len(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidths {
    /// Longest cell of the column plus two.
    Auto,
    Flat(f64),
}

/// One worksheet: title, header row and typed rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub widths: ColumnWidths,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str], widths: ColumnWidths) -> Self {
        Self {
            name: sanitize_sheet_name(name),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            widths,
        }
    }

    pub fn push(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn column_widths(&self) -> Vec<f64> {
        match self.widths {
            ColumnWidths::Flat(w) => vec![w; self.headers.len()],
            ColumnWidths::Auto => (0..self.headers.len())
                .map(|col| {
                    let longest = self
                        .rows
                        .iter()
                        .filter_map(|r| r.get(col))
                        .map(CellValue::display_len)
                        .chain(std::iter::once(self.headers[col].chars().count()))
                        .max()
                        .unwrap_or(0);
                    (longest + 2) as f64
                })
                .collect(),
        }
    }

    /// Serialize as a one-sheet workbook.
    #[instrument(skip(self), fields(sheet = %self.name, rows = self.rows.len()))]
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        let bytes = self.write().map_err(export_error)?;
        debug!(bytes = bytes.len(), "workbook encoded");
        Ok(bytes)
    }

    fn write(&self) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let ws = workbook.add_worksheet();
        ws.set_name(self.name.as_str())?;

        for (col, title) in self.headers.iter().enumerate() {
            ws.write_string_with_format(0, col as u16, title.as_str(), &bold)?;
        }
        for (i, row) in self.rows.iter().enumerate() {
            let r = i as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                match value {
                    CellValue::Text(s) => ws.write_string(r, col as u16, s.as_str())?,
                    CellValue::Number(n) => ws.write_number(r, col as u16, *n)?,
                };
            }
        }
        for (col, width) in self.column_widths().into_iter().enumerate() {
            ws.set_column_width(col as u16, width)?;
        }
        workbook.save_to_buffer()
    }
}

fn export_error(e: XlsxError) -> RenemicoError {
    RenemicoError::ExportError(e.to_string())
}

/// Drop characters a sheet title may not hold and cut to 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(SHEET_NAME_MAX)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Feuille1".to_string()
    } else {
        cleaned
    }
}

/// `historique_MUKENDI.xlsx`
pub fn member_history_filename(member: &Member) -> String {
    format!("historique_{}.xlsx", file_component(&member.nom))
}

pub fn members_sheet(members: &[Member]) -> Sheet {
    let mut sheet = Sheet::new(
        "Membres",
        &[
            "Code", "Nom", "Post-Nom", "Prénom", "Sexe", "Catégorie", "Province", "Statut",
        ],
        ColumnWidths::Auto,
    );
    for m in members {
        let status = match m.status {
            MemberStatus::Active => "Actif",
            MemberStatus::Inactive => "Inactif",
        };
        sheet.push(vec![
            m.code.as_str().into(),
            m.nom.as_str().into(),
            m.post_nom.as_str().into(),
            m.prenom.as_str().into(),
            m.sex.label().into(),
            m.category.label().into(),
            m.province.label().into(),
            status.into(),
        ]);
    }
    sheet
}

pub fn operations_sheet(operations: &[Operation], currency: &str) -> Sheet {
    let amount = format!("Montant ({currency})");
    let mut sheet = Sheet::new(
        "Opérations",
        &["Date", "Type", "Description", &amount],
        ColumnWidths::Auto,
    );
    for op in operations {
        sheet.push(vec![
            short_date(op.date).into(),
            op.kind.label().into(),
            op.motive.as_str().into(),
            CellValue::money(op.amount),
        ]);
    }
    sheet
}

/// One member's months, newest first, in flat 20-wide columns.
pub fn member_history_sheet(member: &Member, contributions: &[Contribution]) -> Sheet {
    let mut sheet = Sheet::new(
        &format!("Historique {}", member.nom),
        &["Mois", "Montant"],
        ColumnWidths::Flat(FLAT_WIDTH),
    );
    for c in aggregate::history_desc(contributions) {
        sheet.push(vec![
            month_year(c.month).into(),
            CellValue::Number(c.amount as f64),
        ]);
    }
    sheet
}

/// Every member's months, by last name then newest month.
pub fn all_history_sheet(members: &[Member], contributions: &[Contribution]) -> Sheet {
    let mut sheet = Sheet::new(
        "Historique Contributions",
        &["Membre", "Code", "Mois", "Montant"],
        ColumnWidths::Auto,
    );
    for line in aggregate::all_members_history(members, contributions) {
        sheet.push(vec![
            format!("{} {}", line.member.nom, line.member.post_nom).into(),
            line.member.code.as_str().into(),
            month_year(line.contribution.month).into(),
            CellValue::Number(line.contribution.amount as f64),
        ]);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{contribution_for, member, member_named, operation};
    use chrono::NaiveDate;
    use renemico_core::OperationKind;

    #[test]
    fn sheet_names_follow_workbook_rules() {
        assert_eq!(sanitize_sheet_name("Historique A/B: [x]?"), "Historique AB x");
        assert_eq!(
            sanitize_sheet_name("Historique KABEYA-MUTOMBO-TSHIBANGU-NGOYI").chars().count(),
            31
        );
        assert_eq!(sanitize_sheet_name("*?"), "Feuille1");
    }

    #[test]
    fn member_history_uses_flat_widths() {
        let m = member();
        let sheet = member_history_sheet(
            &m,
            &[
                contribution_for(&m, 1, 2025, 6, 50),
                contribution_for(&m, 2, 2025, 8, 70),
            ],
        );
        assert_eq!(sheet.name, "Historique MUKENDI");
        assert_eq!(sheet.column_widths(), vec![20.0, 20.0]);
        assert_eq!(sheet.rows[0][0], CellValue::Text("août 2025".into()));
        assert_eq!(sheet.rows[0][1], CellValue::Number(70.0));
        assert_eq!(member_history_filename(&m), "historique_MUKENDI.xlsx");
    }

    #[test]
    fn auto_widths_are_longest_cell_plus_two() {
        let a = member_named(1, "MWAMBA");
        let sheet = all_history_sheet(&[a.clone()], &[contribution_for(&a, 1, 2025, 9, 25)]);
        // "MWAMBA KABAMBA" (14), "CODE0001" (8), "septembre 2025" (14), "Montant" (7).
        assert_eq!(sheet.column_widths(), vec![16.0, 10.0, 16.0, 9.0]);
    }

    #[test]
    fn operations_workbook_is_a_zip() {
        let day = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
        let sheet = operations_sheet(&[operation(1, day, 1_050, OperationKind::Sortie, "Taxi")], "CDF");
        assert_eq!(sheet.headers[3], "Montant (CDF)");
        assert_eq!(sheet.rows[0][0], CellValue::Text("17/08/2025".into()));
        assert_eq!(sheet.rows[0][3], CellValue::Number(10.5));
        let bytes = sheet.to_xlsx().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn members_workbook() {
        let sheet = members_sheet(&[member()]);
        assert_eq!(sheet.headers.len(), 8);
        assert_eq!(sheet.rows[0][4], CellValue::Text("Masculin".into()));
        assert_eq!(sheet.rows[0][7], CellValue::Text("Actif".into()));
        assert!(sheet.to_xlsx().unwrap().starts_with(b"PK"));
    }
}
