// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator accounts.

use std::cell::RefCell;

use chrono::NaiveDate;
use renemico_core::error::{FieldError, RenemicoError, Result};
use renemico_core::lifecycle::generate_username;
use renemico_core::validation::{normalize_user_phone, require, validate_email};
use renemico_core::{RecordId, User, UserForm};
use renemico_document::ImageProcessor;
use renemico_document::image::processor::PHOTO_MAX_EDGE;
use renemico_document::qr;
use renemico_store::Registry;
use tracing::{info, instrument};

use super::app_services::AppServices;

impl AppServices {
    /// Create an operator account.
    ///
    /// The phone is normalized to `+243XXXXXXXXX`, a missing username is
    /// derived from the initials and `as_of`, the photo is bounded to
    /// 800×800 and the account QR is committed with the record.
    #[instrument(skip_all, fields(as_of = %as_of))]
    pub fn create_user(&self, form: UserForm, as_of: NaiveDate) -> Result<User> {
        let first_name = require("first_name", &form.first_name)?;
        let last_name = require("last_name", &form.last_name)?;
        let phone = normalize_user_phone(&form.phone)?;
        let email = validate_email(Some(&form.email))?
            .ok_or_else(|| FieldError::new("email", "Ce champ est obligatoire"))?;
        let photo = form.photo.as_deref().map(bounded_photo).transpose()?;
        let size = self.config()?.qr_size_px;

        let registry = self.registry()?;
        let username = match form.username.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given.to_string(),
            _ => free_username(&registry, &first_name, &last_name, as_of)?,
        };

        let mut user = User {
            id: 0,
            username,
            first_name,
            last_name,
            email,
            phone,
            level: form.level,
            photo,
            qrcode: None,
            is_verified: false,
        };
        user.qrcode = Some(qr::render_png(&qr::user_payload(&user), size)?);
        user.id = registry.insert_user(&user)?;

        info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Mark an account as verified.
    #[instrument(skip(self))]
    pub fn verify_user(&self, id: RecordId) -> Result<User> {
        let registry = self.registry()?;
        let mut user = fetch_user(&registry, id)?;
        user.is_verified = true;
        registry.update_user(&user)?;
        Ok(user)
    }

    pub fn user(&self, id: RecordId) -> Result<User> {
        fetch_user(&*self.registry()?, id)
    }

    pub fn user_by_username(&self, username: &str) -> Result<User> {
        self.registry()?
            .find_user_by_username(username.trim())?
            .ok_or_else(|| RenemicoError::not_found("user", username))
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.registry()?.list_users()
    }

    pub fn delete_user(&self, id: RecordId) -> Result<()> {
        self.registry()?.delete_user(id)
    }
}

pub(crate) fn fetch_user(registry: &Registry, id: RecordId) -> Result<User> {
    registry
        .get_user(id)?
        .ok_or_else(|| RenemicoError::not_found("user", id))
}

/// Decode, straighten and shrink an uploaded photo to fit 800×800.
fn bounded_photo(bytes: &[u8]) -> Result<Vec<u8>> {
    ImageProcessor::from_bytes(bytes)?
        .thumbnail(PHOTO_MAX_EDGE)
        .to_png_bytes()
}

fn free_username(
    registry: &Registry,
    first_name: &str,
    last_name: &str,
    as_of: NaiveDate,
) -> Result<String> {
    let failure = RefCell::new(None);
    let username = generate_username(first_name, last_name, as_of, |candidate| {
        match registry.username_taken(candidate) {
            Ok(taken) => taken,
            Err(e) => {
                failure.borrow_mut().get_or_insert(e);
                false
            }
        }
    });
    match failure.into_inner() {
        Some(e) => Err(e),
        None => Ok(username),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::membership::tests::{d, services};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use renemico_core::UserLevel;
    use std::io::Cursor;

    pub(crate) fn user_form(phone: &str) -> UserForm {
        UserForm {
            username: None,
            first_name: "jean".into(),
            last_name: "mukendi".into(),
            email: "Jean.Mukendi@Renemico.com".into(),
            phone: phone.into(),
            level: UserLevel::Operator,
            photo: None,
        }
    }

    fn jpeg(w: u32, h: u32) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .write_to(&mut cursor, ImageFormat::Jpeg)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn usernames_are_derived_and_deduplicated() {
        let svc = services();
        let first = svc.create_user(user_form("0812345678"), d(2025, 8, 17)).unwrap();
        assert_eq!(first.username, "JM1708");
        assert_eq!(first.phone, "+243812345678");
        assert_eq!(first.email, "jean.mukendi@renemico.com");
        assert!(first.qrcode.is_some());

        let second = svc
            .create_user(user_form("+243 899 000 111"), d(2025, 8, 17))
            .unwrap();
        assert_eq!(second.username, "JM17081");
        assert_eq!(svc.user_by_username("JM17081").unwrap().id, second.id);
    }

    #[test]
    fn phone_is_unique_and_well_formed() {
        let svc = services();
        svc.create_user(user_form("0812345678"), d(2025, 8, 17)).unwrap();
        assert!(matches!(
            svc.create_user(user_form("+243812345678"), d(2025, 8, 17)),
            Err(RenemicoError::Validation(ref f)) if f.field == "phone"
        ));
        assert!(matches!(
            svc.create_user(user_form("12345"), d(2025, 8, 17)),
            Err(RenemicoError::Validation(ref f)) if f.field == "phone"
        ));
        assert_eq!(svc.users().unwrap().len(), 1);
    }

    #[test]
    fn email_is_required() {
        let svc = services();
        let mut form = user_form("0812345678");
        form.email = " ".into();
        assert!(matches!(
            svc.create_user(form, d(2025, 8, 17)),
            Err(RenemicoError::Validation(ref f)) if f.field == "email"
        ));
    }

    #[test]
    fn large_photos_are_bounded() {
        let svc = services();
        let mut form = user_form("0812345678");
        form.photo = Some(jpeg(1600, 1000));
        let user = svc.create_user(form, d(2025, 8, 17)).unwrap();
        let stored = image::load_from_memory(user.photo.as_deref().unwrap()).unwrap();
        assert_eq!((stored.width(), stored.height()), (800, 500));

        let verified = svc.verify_user(user.id).unwrap();
        assert!(verified.is_verified);
        assert!(svc.user(user.id).unwrap().is_verified);
    }

    #[test]
    fn unreadable_photo_is_rejected() {
        let svc = services();
        let mut form = user_form("0812345678");
        form.photo = Some(b"not an image".to_vec());
        assert!(matches!(
            svc.create_user(form, d(2025, 8, 17)),
            Err(RenemicoError::ImageError(_))
        ));
    }
}
