// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-field validators. Each returns the cleaned value or the field error
// shown next to the offending input.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::FieldError;

/// Minimum age at registration.
pub const MINIMUM_AGE: u32 = 18;

/// Country calling code every operator phone number is normalized to.
pub const PHONE_PREFIX: &str = "+243";

/// Full years elapsed between `birth` and `as_of`.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

pub fn validate_birth_date(birth: NaiveDate, as_of: NaiveDate) -> Result<NaiveDate, FieldError> {
    if birth > as_of {
        return Err(FieldError::new(
            "birth_date",
            "La date de naissance ne peut pas être dans le futur",
        ));
    }
    if age_on(birth, as_of) < MINIMUM_AGE as i32 {
        return Err(FieldError::new(
            "birth_date",
            "Le membre doit avoir au moins 18 ans",
        ));
    }
    Ok(birth)
}

/// Member phone numbers are optional but digits only when present.
pub fn validate_member_phone(phone: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::new(
            "phone",
            "Le numéro de téléphone doit contenir uniquement des chiffres",
        ));
    }
    Ok(Some(phone.to_string()))
}

/// Normalize an operator phone number to `+243` followed by nine digits.
///
/// Anything other than digits and `+` is dropped. Numbers without the
/// country prefix keep their last nine digits.
pub fn normalize_user_phone(raw: &str) -> Result<String, FieldError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let normalized = if cleaned.starts_with(PHONE_PREFIX) {
        cleaned
    } else {
        let digits: Vec<char> = cleaned.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits[digits.len().saturating_sub(9)..].iter().collect();
        format!("{PHONE_PREFIX}{tail}")
    };

    let valid = normalized.len() == PHONE_PREFIX.len() + 9
        && normalized[1..].chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(FieldError::new(
            "phone",
            "Format de numéro invalide. Doit être +243 suivi de 9 chiffres",
        ));
    }
    Ok(normalized)
}

/// Contribution amounts are whole, strictly positive units.
pub fn validate_contribution_amount(amount: i64) -> Result<i64, FieldError> {
    if amount <= 0 {
        return Err(FieldError::new(
            "amount",
            "Le montant doit être supérieur à zéro",
        ));
    }
    Ok(amount)
}

/// Ledger amounts are positive and kept to two decimal places.
pub fn validate_operation_amount(amount: Decimal) -> Result<Decimal, FieldError> {
    if amount <= Decimal::ZERO {
        return Err(FieldError::new(
            "amount",
            "Le montant doit être supérieur à zéro",
        ));
    }
    Ok(amount.round_dp(2))
}

pub fn validate_email(email: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.contains(char::is_whitespace) {
        return Err(FieldError::new("email", "Adresse email invalide"));
    }
    Ok(Some(email.to_lowercase()))
}

/// Reject blank mandatory text fields.
pub fn require(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "Ce champ est obligatoire"));
    }
    Ok(trimmed.to_string())
}

/// Parse a month picker value (`YYYY-MM`, or a full date) to the first of that month.
pub fn parse_month(raw: &str) -> Result<NaiveDate, FieldError> {
    let raw = raw.trim();
    let parsed = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match parsed {
        Ok(date) => Ok(crate::types::first_of_month(date)),
        Err(_) => Err(FieldError::new(
            "month",
            "Format de mois invalide. Utilisez AAAA-MM",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn birth_date_in_future_rejected() {
        let err = validate_birth_date(d(2030, 1, 1), d(2026, 10, 18)).unwrap_err();
        assert_eq!(err.field, "birth_date");
        assert!(err.reason.contains("futur"));
    }

    #[test]
    fn eighteenth_birthday_is_the_cutoff() {
        let as_of = d(2026, 10, 18);
        assert!(validate_birth_date(d(2008, 10, 18), as_of).is_ok());
        let err = validate_birth_date(d(2008, 10, 19), as_of).unwrap_err();
        assert!(err.reason.contains("18 ans"));
    }

    #[test]
    fn member_phone_digits_only() {
        assert_eq!(validate_member_phone(Some("0812345678")).unwrap().as_deref(), Some("0812345678"));
        assert_eq!(validate_member_phone(Some("  ")).unwrap(), None);
        assert!(validate_member_phone(Some("081-234")).is_err());
    }

    #[test]
    fn user_phone_normalization() {
        assert_eq!(normalize_user_phone("+243 812 345 678").unwrap(), "+243812345678");
        assert_eq!(normalize_user_phone("0812345678").unwrap(), "+243812345678");
        assert_eq!(normalize_user_phone("(081) 234-5678").unwrap(), "+243812345678");
        assert!(normalize_user_phone("12345").is_err());
        assert!(normalize_user_phone("+2438123456789").is_err());
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(validate_contribution_amount(0).is_err());
        assert!(validate_contribution_amount(-5).is_err());
        assert_eq!(validate_contribution_amount(50).unwrap(), 50);
        assert_eq!(
            validate_operation_amount(Decimal::new(12345, 3)).unwrap(),
            Decimal::new(1235, 2)
        );
        assert!(validate_operation_amount(Decimal::ZERO).is_err());
    }

    #[test]
    fn email_shapes() {
        assert_eq!(
            validate_email(Some("Jean@Example.cd")).unwrap().as_deref(),
            Some("jean@example.cd")
        );
        assert_eq!(validate_email(None).unwrap(), None);
        assert!(validate_email(Some("jean@")).is_err());
        assert!(validate_email(Some("jean.example.cd")).is_err());
    }

    #[test]
    fn month_parses_to_first_day() {
        assert_eq!(parse_month("2025-08").unwrap(), d(2025, 8, 1));
        assert_eq!(parse_month("2025-08-17").unwrap(), d(2025, 8, 1));
        assert!(parse_month("août 2025").is_err());
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(require("nom", "  Kabila ").unwrap(), "Kabila");
        assert!(require("nom", "   ").is_err());
    }
}
