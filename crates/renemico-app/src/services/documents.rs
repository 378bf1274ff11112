// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document services: fetch records, render, and hand back named byte
// streams with their content type.
//
// Lookups that miss surface as `NotFound`. Any failure after the records are
// fetched is logged and reported as `RenderFailed`; no partial bytes leave
// this module.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use renemico_core::error::{RenemicoError, Result};
use renemico_core::{DocumentType, RecordId};
use renemico_document::export::xlsx::{self, Sheet};
use renemico_document::pdf;
use renemico_document::PdfOutput;
use tracing::{error, info, instrument};

use super::app_services::AppServices;
use super::membership::fetch;
use super::users::fetch_user;

/// A finished document, ready to be sent or written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    fn pdf(filename: String, output: PdfOutput) -> Self {
        Self {
            filename,
            content_type: DocumentType::Pdf.mime_type(),
            bytes: output.bytes,
        }
    }

    fn xlsx(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: DocumentType::Xlsx.mime_type(),
            bytes,
        }
    }

    /// Write the document into `dir` under its own filename.
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "document written");
        Ok(path)
    }
}

/// Turn a rendering error into the generic failure callers see.
fn rendered<T>(document: &'static str, result: Result<T>) -> Result<T> {
    result.map_err(|e| {
        error!(document, error = %e, "document rendering failed");
        RenemicoError::RenderFailed {
            document,
            reason: e.to_string(),
        }
    })
}

fn export(document: &'static str, filename: impl Into<String>, sheet: Sheet) -> Result<RenderedDocument> {
    let bytes = rendered(document, sheet.to_xlsx())?;
    Ok(RenderedDocument::xlsx(filename, bytes))
}

impl AppServices {
    // -- PDF -----------------------------------------------------------------

    #[instrument(skip(self))]
    pub fn member_card(&self, member_id: RecordId) -> Result<RenderedDocument> {
        let member = fetch(&*self.registry()?, member_id)?;
        let ctx = self.render_context()?;
        let output = rendered("card", pdf::render_card(&ctx, &member))?;
        Ok(RenderedDocument::pdf(pdf::card_filename(&member), output))
    }

    #[instrument(skip(self))]
    pub fn invoice(&self, contribution_id: RecordId) -> Result<RenderedDocument> {
        let (contribution, member) = {
            let registry = self.registry()?;
            let contribution = registry
                .get_contribution(contribution_id)?
                .ok_or_else(|| RenemicoError::not_found("contribution", contribution_id))?;
            let member = fetch(&registry, contribution.member_id)?;
            (contribution, member)
        };
        let ctx = self.render_context()?;
        let output = rendered("invoice", pdf::render_invoice(&ctx, &contribution, &member))?;
        Ok(RenderedDocument::pdf(
            pdf::invoice_filename(&contribution, &member),
            output,
        ))
    }

    #[instrument(skip(self))]
    pub fn member_history(&self, member_id: RecordId, as_of: NaiveDate) -> Result<RenderedDocument> {
        let (member, contributions) = {
            let registry = self.registry()?;
            let member = fetch(&registry, member_id)?;
            (member, registry.contributions_for(member_id)?)
        };
        let ctx = self.render_context()?;
        let output = rendered(
            "member history",
            pdf::render_member_history(&ctx, &member, &contributions, as_of),
        )?;
        Ok(RenderedDocument::pdf(
            pdf::member_history_filename(&member),
            output,
        ))
    }

    #[instrument(skip(self))]
    pub fn all_history(&self, as_of: NaiveDate) -> Result<RenderedDocument> {
        let (members, contributions) = {
            let registry = self.registry()?;
            (registry.list_members()?, registry.all_contributions()?)
        };
        let ctx = self.render_context()?;
        let output = rendered(
            "all members history",
            pdf::render_all_history(&ctx, &members, &contributions, as_of),
        )?;
        Ok(RenderedDocument::pdf(pdf::ALL_MEMBERS_FILENAME.into(), output))
    }

    /// Ledger report for a period token (`mensuel`, ...). Unknown tokens
    /// report every operation.
    #[instrument(skip(self))]
    pub fn ledger_report(&self, token: &str, as_of: NaiveDate) -> Result<RenderedDocument> {
        let operations = self.registry()?.list_operations()?;
        let ctx = self.render_context()?;
        let output = rendered(
            "ledger report",
            pdf::render_report(&ctx, token, &operations, as_of),
        )?;
        Ok(RenderedDocument::pdf(pdf::report_filename(token), output))
    }

    #[instrument(skip(self))]
    pub fn user_card(&self, user_id: RecordId) -> Result<RenderedDocument> {
        let user = fetch_user(&*self.registry()?, user_id)?;
        let ctx = self.render_context()?;
        let output = rendered("user card", pdf::render_user_card(&ctx, &user))?;
        Ok(RenderedDocument::pdf(pdf::user_card_filename(&user), output))
    }

    // -- XLSX ----------------------------------------------------------------

    #[instrument(skip(self))]
    pub fn export_members(&self) -> Result<RenderedDocument> {
        let members = self.registry()?.list_members()?;
        export("members export", xlsx::MEMBERS_FILENAME, xlsx::members_sheet(&members))
    }

    #[instrument(skip(self))]
    pub fn export_operations(&self) -> Result<RenderedDocument> {
        let operations = self.registry()?.list_operations()?;
        let currency = self.config()?.currency_code;
        export(
            "operations export",
            xlsx::OPERATIONS_FILENAME,
            xlsx::operations_sheet(&operations, &currency),
        )
    }

    #[instrument(skip(self))]
    pub fn export_member_history(&self, member_id: RecordId) -> Result<RenderedDocument> {
        let (member, contributions) = {
            let registry = self.registry()?;
            let member = fetch(&registry, member_id)?;
            (member, registry.contributions_for(member_id)?)
        };
        export(
            "member history export",
            xlsx::member_history_filename(&member),
            xlsx::member_history_sheet(&member, &contributions),
        )
    }

    #[instrument(skip(self))]
    pub fn export_all_history(&self) -> Result<RenderedDocument> {
        let (members, contributions) = {
            let registry = self.registry()?;
            (registry.list_members()?, registry.all_contributions()?)
        };
        export(
            "all history export",
            xlsx::ALL_HISTORY_FILENAME,
            xlsx::all_history_sheet(&members, &contributions),
        )
    }
}
