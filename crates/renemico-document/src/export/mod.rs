// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadsheet exports.

pub mod xlsx;

pub use xlsx::{CellValue, ColumnWidths, Sheet, sanitize_sheet_name};
