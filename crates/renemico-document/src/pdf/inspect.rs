// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-back of produced PDFs.

use lopdf::Document;
use renemico_core::error::{RenemicoError, Result};

/// Number of pages in a serialized PDF.
pub fn page_count(bytes: &[u8]) -> Result<usize> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| RenemicoError::PdfError(format!("failed to parse PDF: {e}")))?;
    Ok(doc.get_pages().len())
}
