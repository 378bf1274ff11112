// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Member lifecycle: registration, edits, card reactivation and duplicatas.
//
// Every save re-renders the member's QR image and stores it alongside the
// record. Concurrent saves simply overwrite each other's QR.

use chrono::{DateTime, NaiveDate, Utc};
use renemico_core::error::{RenemicoError, Result};
use renemico_core::lifecycle;
use renemico_core::validation::require;
use renemico_core::{Duplicata, Member, MemberForm, RecordId};
use renemico_document::qr;
use renemico_store::Registry;
use tracing::{info, instrument, warn};

use super::app_services::AppServices;

/// Fresh codes tried before giving up.
const CODE_ATTEMPTS: usize = 16;

impl AppServices {
    // -- Write paths ---------------------------------------------------------

    /// Validate and normalize the form, assign a fresh code and a 36-month
    /// expiration, store the member and commit its QR image.
    #[instrument(skip_all, fields(as_of = %as_of))]
    pub fn register_member(&self, form: MemberForm, as_of: NaiveDate) -> Result<Member> {
        let form = lifecycle::prepare_member_form(form, as_of)?;
        let registry = self.registry()?;
        let code = unique_code(&registry)?;

        let mut member = lifecycle::new_member(form, code, as_of);
        member.id = registry.insert_member(&member)?;
        self.commit_qr(&registry, &mut member)?;

        info!(member_id = member.id, code = %member.code, "member registered");
        Ok(member)
    }

    /// Apply an edit form. Code, registration and expiration dates are kept.
    #[instrument(skip(self, form))]
    pub fn edit_member(&self, id: RecordId, form: MemberForm, as_of: NaiveDate) -> Result<Member> {
        let form = lifecycle::prepare_member_form(form, as_of)?;
        let registry = self.registry()?;
        let mut member = fetch(&registry, id)?;

        lifecycle::apply_member_edit(&mut member, form, as_of);
        registry.update_member(&member)?;
        self.commit_qr(&registry, &mut member)?;
        Ok(member)
    }

    /// Extend an expired card by 36 months from its last expiration.
    ///
    /// Refused with [`RenemicoError::CardStillValid`] while the card is valid.
    #[instrument(skip(self))]
    pub fn reactivate_member(&self, id: RecordId, as_of: NaiveDate) -> Result<Member> {
        let registry = self.registry()?;
        let mut member = fetch(&registry, id)?;

        let expires_on = lifecycle::reactivate(&mut member, as_of)?;
        member.card_renewed = true;
        registry.update_member(&member)?;
        self.commit_qr(&registry, &mut member)?;

        info!(member_id = id, %expires_on, "card reactivated");
        Ok(member)
    }

    /// Reissue the card with a fresh QR code. The expiration date is kept,
    /// so this works while the card is still valid.
    #[instrument(skip(self))]
    pub fn renew_card(&self, id: RecordId, as_of: NaiveDate) -> Result<Member> {
        let registry = self.registry()?;
        let mut member = fetch(&registry, id)?;

        member.updated_on = as_of;
        member.card_renewed = true;
        registry.update_member(&member)?;
        self.commit_qr(&registry, &mut member)?;

        info!(member_id = id, expires_on = %member.expires_on, "card renewed");
        Ok(member)
    }

    /// Record a reissued card under a globally unique card number.
    #[instrument(skip(self))]
    pub fn record_duplicata(
        &self,
        member_id: RecordId,
        card_number: &str,
        at: DateTime<Utc>,
    ) -> Result<Duplicata> {
        let card_number = require("card_number", card_number)?.to_uppercase();
        let registry = self.registry()?;
        fetch(&registry, member_id)?;
        registry.insert_duplicata(member_id, &card_number, at)
    }

    #[instrument(skip(self))]
    pub fn delete_member(&self, id: RecordId) -> Result<()> {
        self.registry()?.delete_member(id)
    }

    // -- Reads ---------------------------------------------------------------

    pub fn member(&self, id: RecordId) -> Result<Member> {
        fetch(&*self.registry()?, id)
    }

    pub fn member_by_code(&self, code: &str) -> Result<Member> {
        self.registry()?
            .find_member_by_code(code.trim())?
            .ok_or_else(|| RenemicoError::not_found("member", code))
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        self.registry()?.list_members()
    }

    pub fn search_members(&self, query: &str) -> Result<Vec<Member>> {
        self.registry()?.search_members(query)
    }

    pub fn duplicatas(&self) -> Result<Vec<Duplicata>> {
        self.registry()?.list_duplicatas()
    }

    // -- Helpers -------------------------------------------------------------

    fn commit_qr(&self, registry: &Registry, member: &mut Member) -> Result<()> {
        let ctx = self.render_context()?;
        let size = self.config()?.qr_size_px;
        let png = qr::render_png(&qr::member_payload(member, &ctx.branding), size)?;
        registry.set_member_qrcode(member.id, &png)?;
        member.qrcode = Some(png);
        Ok(())
    }
}

pub(crate) fn fetch(registry: &Registry, id: RecordId) -> Result<Member> {
    registry
        .get_member(id)?
        .ok_or_else(|| RenemicoError::not_found("member", id))
}

fn unique_code(registry: &Registry) -> Result<String> {
    for _ in 0..CODE_ATTEMPTS {
        let code = lifecycle::generate_member_code();
        if !registry.member_code_taken(&code)? {
            return Ok(code);
        }
        warn!(%code, "member code collision, drawing again");
    }
    Err(RenemicoError::invalid(
        "code",
        "Impossible d'attribuer un code membre unique.",
    ))
}
