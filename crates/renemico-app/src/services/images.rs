// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image serving: photos and QR codes with their caching headers.

use chrono::{DateTime, Duration, Utc};
use image::ImageFormat;
use renemico_core::error::{RenemicoError, Result};
use renemico_core::{DocumentType, RecordId};
use renemico_document::ImageProcessor;
use renemico_document::image::avatar;
use renemico_document::qr;
use tracing::{debug, instrument, warn};

use super::app_services::{AppServices, hash_bytes};
use super::membership::fetch;
use super::users::fetch_user;

/// Lifetime of a generated default avatar, in seconds.
pub const AVATAR_MAX_AGE: u64 = 86_400;

const SECONDS_PER_DAY: u64 = 86_400;

/// An encoded raster plus the headers it is served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    /// `max-age=<seconds>, public`
    pub cache_control: String,
    /// RFC 1123 date in GMT.
    pub expires: String,
    /// SHA-256 of `bytes`, hex encoded.
    pub etag: String,
}

impl ServedImage {
    pub fn new(
        bytes: Vec<u8>,
        content_type: &'static str,
        max_age_secs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let expires = i64::try_from(max_age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|age| now.checked_add_signed(age))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            etag: hash_bytes(&bytes),
            content_type,
            cache_control: format!("max-age={max_age_secs}, public"),
            expires: http_date(expires),
            bytes,
        }
    }
}

/// `Sun, 17 Aug 2025 10:00:00 GMT`
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Stored bytes as JPEG or PNG. Other formats are re-encoded to PNG.
fn web_ready(bytes: &[u8]) -> Result<(Vec<u8>, &'static str)> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok((bytes.to_vec(), DocumentType::Jpeg.mime_type())),
        Ok(ImageFormat::Png) => Ok((bytes.to_vec(), DocumentType::Png.mime_type())),
        _ => {
            debug!("re-encoding stored image to PNG");
            let png = ImageProcessor::from_bytes(bytes)?.to_png_bytes()?;
            Ok((png, DocumentType::Png.mime_type()))
        }
    }
}

impl AppServices {
    fn cache_secs(&self) -> Result<u64> {
        Ok(u64::from(self.config()?.image_cache_days) * SECONDS_PER_DAY)
    }

    #[instrument(skip(self))]
    pub fn member_photo(&self, member_id: RecordId, now: DateTime<Utc>) -> Result<ServedImage> {
        let member = fetch(&*self.registry()?, member_id)?;
        let photo = member
            .photo
            .ok_or_else(|| RenemicoError::not_found("member photo", member_id))?;
        let (bytes, content_type) = web_ready(&photo)?;
        Ok(ServedImage::new(bytes, content_type, self.cache_secs()?, now))
    }

    /// The operator's photo, or a generated avatar when there is none or it
    /// cannot be decoded.
    #[instrument(skip(self))]
    pub fn user_photo(&self, user_id: RecordId, now: DateTime<Utc>) -> Result<ServedImage> {
        let user = fetch_user(&*self.registry()?, user_id)?;
        if let Some(photo) = user.photo.as_deref() {
            match web_ready(photo) {
                Ok((bytes, content_type)) => {
                    return Ok(ServedImage::new(bytes, content_type, self.cache_secs()?, now));
                }
                Err(e) => warn!(user = %user.username, error = %e, "stored photo unreadable"),
            }
        }
        let png = avatar::render_png(&user.full_name())?;
        Ok(ServedImage::new(
            png,
            DocumentType::Png.mime_type(),
            AVATAR_MAX_AGE,
            now,
        ))
    }

    /// The committed QR image, rendered afresh if none was stored.
    #[instrument(skip(self))]
    pub fn member_qrcode(&self, member_id: RecordId, now: DateTime<Utc>) -> Result<ServedImage> {
        let member = fetch(&*self.registry()?, member_id)?;
        let png = match member.qrcode.clone() {
            Some(png) => png,
            None => {
                let ctx = self.render_context()?;
                qr::render_png(
                    &qr::member_payload(&member, &ctx.branding),
                    self.config()?.qr_size_px,
                )?
            }
        };
        Ok(ServedImage::new(
            png,
            DocumentType::Png.mime_type(),
            self.cache_secs()?,
            now,
        ))
    }

    #[instrument(skip(self))]
    pub fn user_qrcode(&self, user_id: RecordId, now: DateTime<Utc>) -> Result<ServedImage> {
        let user = fetch_user(&*self.registry()?, user_id)?;
        let png = match user.qrcode.clone() {
            Some(png) => png,
            None => qr::render_png(&qr::user_payload(&user), self.config()?.qr_size_px)?,
        };
        Ok(ServedImage::new(
            png,
            DocumentType::Png.mime_type(),
            self.cache_secs()?,
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::membership::tests::{d, form, services};
    use crate::services::users::tests::user_form;
    use chrono::TimeZone;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 17, 10, 0, 0).unwrap()
    }

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
            .write_to(&mut cursor, format)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn headers_follow_max_age() {
        let served = ServedImage::new(b"abc".to_vec(), "image/png", 86_400, now());
        assert_eq!(served.cache_control, "max-age=86400, public");
        assert_eq!(served.expires, "Mon, 18 Aug 2025 10:00:00 GMT");
        assert_eq!(
            served.etag,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn member_photo_keeps_jpeg_and_reencodes_others() {
        let svc = services();
        let mut f = form("mukendi");
        f.photo = Some(encoded(ImageFormat::Jpeg));
        let member = svc.register_member(f, d(2025, 8, 1)).unwrap();

        let served = svc.member_photo(member.id, now()).unwrap();
        assert_eq!(served.content_type, "image/jpeg");
        assert_eq!(served.cache_control, "max-age=2592000, public");

        let mut f = form("ilunga");
        f.photo = Some(encoded(ImageFormat::Bmp));
        let other = svc.register_member(f, d(2025, 8, 1)).unwrap();
        let served = svc.member_photo(other.id, now()).unwrap();
        assert_eq!(served.content_type, "image/png");
        assert!(served.bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn member_without_photo_is_not_found() {
        let svc = services();
        let member = svc.register_member(form("mukendi"), d(2025, 8, 1)).unwrap();
        assert!(matches!(
            svc.member_photo(member.id, now()),
            Err(RenemicoError::NotFound { .. })
        ));
        let qr = svc.member_qrcode(member.id, now()).unwrap();
        assert_eq!(Some(qr.bytes), svc.member(member.id).unwrap().qrcode);
    }

    #[test]
    fn default_avatar_is_cached_for_a_day() {
        let svc = services();
        let user = svc.create_user(user_form("0812345678"), d(2025, 8, 17)).unwrap();
        let served = svc.user_photo(user.id, now()).unwrap();
        assert_eq!(served.content_type, "image/png");
        assert_eq!(served.cache_control, "max-age=86400, public");
        let avatar = image::load_from_memory(&served.bytes).unwrap();
        assert_eq!((avatar.width(), avatar.height()), (200, 200));

        let qr = svc.user_qrcode(user.id, now()).unwrap();
        assert_eq!(qr.etag, hash_bytes(user.qrcode.as_deref().unwrap()));
    }
}
