// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pre-save transformations applied by the service layer before a record is
// written: field validation, upper-casing, code and expiration assignment,
// card reactivation and username generation.

use chrono::{Datelike, Months, NaiveDate};
use uuid::Uuid;

use crate::error::{FieldError, RenemicoError, Result};
use crate::types::{Member, MemberForm, MemberStatus};
use crate::validation;

/// Length of a membership card's validity.
pub const CARD_VALIDITY: Months = Months::new(36);

/// Function printed on the card when none is given.
pub const DEFAULT_FUNCTION: &str = "MEMBRE";

/// Validate a member form and return it in its stored shape.
///
/// Text fields are trimmed and upper-cased, the email is lower-cased and a
/// missing function falls back to [`DEFAULT_FUNCTION`].
pub fn prepare_member_form(form: MemberForm, as_of: NaiveDate) -> std::result::Result<MemberForm, FieldError> {
    let nom = validation::require("nom", &form.nom)?;
    let post_nom = validation::require("post_nom", &form.post_nom)?;
    let prenom = validation::require("prenom", &form.prenom)?;
    let birth_place = validation::require("birth_place", &form.birth_place)?;
    let birth_date = validation::validate_birth_date(form.birth_date, as_of)?;
    let phone = validation::validate_member_phone(form.phone.as_deref())?;
    let email = validation::validate_email(form.email.as_deref())?;

    Ok(MemberForm {
        nom: nom.to_uppercase(),
        post_nom: post_nom.to_uppercase(),
        prenom: prenom.to_uppercase(),
        birth_place: birth_place.to_uppercase(),
        birth_date,
        phone,
        email,
        function: upper_opt(form.function).or_else(|| Some(DEFAULT_FUNCTION.to_string())),
        site: upper_opt(form.site),
        address: upper_opt(form.address),
        profession: upper_opt(form.profession),
        observations: trim_opt(form.observations),
        ..form
    })
}

fn trim_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn upper_opt(value: Option<String>) -> Option<String> {
    trim_opt(value).map(|v| v.to_uppercase())
}

/// Fresh eight-character member code.
pub fn generate_member_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Expiration of a card issued on `registered_on`.
pub fn initial_expiration(registered_on: NaiveDate) -> NaiveDate {
    extend(registered_on)
}

fn extend(from: NaiveDate) -> NaiveDate {
    // Only fails past year 262143.
    from.checked_add_months(CARD_VALIDITY).unwrap_or(NaiveDate::MAX)
}

/// Build a new member from a prepared form.
pub fn new_member(form: MemberForm, code: String, registered_on: NaiveDate) -> Member {
    Member {
        id: 0,
        code,
        province: form.province,
        category: form.category,
        function: form.function,
        site: form.site,
        nom: form.nom,
        post_nom: form.post_nom,
        prenom: form.prenom,
        sex: form.sex,
        birth_date: form.birth_date,
        birth_place: form.birth_place,
        address: form.address,
        phone: form.phone,
        email: form.email,
        photo: form.photo,
        qrcode: None,
        registered_on,
        updated_on: registered_on,
        expires_on: initial_expiration(registered_on),
        status: form.status,
        profession: form.profession,
        observations: form.observations,
        card_renewed: false,
    }
}

/// Apply an edit form to an existing member.
///
/// Code, registration date and expiration are never touched by an edit. A
/// new photo replaces the old one; an absent photo keeps the current one.
pub fn apply_member_edit(member: &mut Member, form: MemberForm, as_of: NaiveDate) {
    member.province = form.province;
    member.category = form.category;
    member.function = form.function;
    member.site = form.site;
    member.nom = form.nom;
    member.post_nom = form.post_nom;
    member.prenom = form.prenom;
    member.sex = form.sex;
    member.birth_date = form.birth_date;
    member.birth_place = form.birth_place;
    member.address = form.address;
    member.phone = form.phone;
    member.email = form.email;
    if form.photo.is_some() {
        member.photo = form.photo;
    }
    member.status = form.status;
    member.profession = form.profession;
    member.observations = form.observations;
    member.updated_on = as_of;
}

/// Extend an expired card by another validity period, counted from its last
/// expiration, and mark the member active.
///
/// A card that is still valid on `as_of` is refused: lost or damaged cards
/// go through a duplicata instead.
pub fn reactivate(member: &mut Member, as_of: NaiveDate) -> Result<NaiveDate> {
    if member.expires_on > as_of {
        return Err(RenemicoError::CardStillValid {
            until: member.expires_on,
        });
    }
    member.expires_on = extend(member.expires_on);
    member.status = MemberStatus::Active;
    member.updated_on = as_of;
    Ok(member.expires_on)
}

/// Username stem: first-name initial, last-name initial, then `DDMM` of `as_of`.
pub fn username_base(first_name: &str, last_name: &str, as_of: NaiveDate) -> String {
    let initial = |s: &str| s.trim().chars().next().unwrap_or('X');
    format!(
        "{}{}{:02}{:02}",
        initial(first_name),
        initial(last_name),
        as_of.day(),
        as_of.month()
    )
    .to_uppercase()
}

/// First username derived from the stem that `taken` does not reject,
/// appending 1, 2, ... on collisions.
pub fn generate_username(
    first_name: &str,
    last_name: &str,
    as_of: NaiveDate,
    taken: impl Fn(&str) -> bool,
) -> String {
    let base = username_base(first_name, last_name, as_of);
    if !taken(&base) {
        return base;
    }
    (1u32..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
