// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for document tests.

use std::io::Cursor;

use chrono::{NaiveDate, TimeZone, Utc};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use renemico_core::{
    Category, Contribution, Member, MemberStatus, Operation, OperationKind, Province, RecordId,
    Sex, User, UserLevel,
};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn as_of() -> NaiveDate {
    d(2025, 8, 17)
}

pub fn member() -> Member {
    Member {
        id: 1,
        code: "AB12CD34".into(),
        province: Province::Lualaba,
        category: Category::Effective,
        function: None,
        site: None,
        nom: "MUKENDI".into(),
        post_nom: "KABAMBA".into(),
        prenom: "JEAN".into(),
        sex: Sex::Male,
        birth_date: d(1980, 5, 12),
        birth_place: "LIKASI".into(),
        address: None,
        phone: None,
        email: None,
        photo: None,
        qrcode: None,
        registered_on: d(2025, 8, 1),
        updated_on: d(2025, 8, 1),
        expires_on: d(2028, 8, 1),
        status: MemberStatus::Active,
        profession: None,
        observations: None,
        card_renewed: false,
    }
}

pub fn member_named(id: RecordId, nom: &str) -> Member {
    Member {
        id,
        code: format!("CODE{id:04}"),
        nom: nom.into(),
        ..member()
    }
}

pub fn contribution_for(
    member: &Member,
    id: RecordId,
    year: i32,
    month: u32,
    amount: i64,
) -> Contribution {
    Contribution {
        id,
        member_id: member.id,
        month: d(year, month, 1),
        amount,
        paid_at: Utc.with_ymd_and_hms(year, month, 5, 10, 0, 0).unwrap(),
    }
}

/// August 2025, paid on the 5th.
pub fn contribution(id: RecordId, amount: i64) -> Contribution {
    contribution_for(&member(), id, 2025, 8, amount)
}

pub fn operation(
    id: RecordId,
    date: NaiveDate,
    cents: i64,
    kind: OperationKind,
    motive: &str,
) -> Operation {
    Operation {
        id,
        date,
        motive: motive.into(),
        amount: Decimal::new(cents, 2),
        collected_by: "CAISSIER".into(),
        kind,
    }
}

pub fn user() -> User {
    User {
        id: 7,
        username: "jmukendi".into(),
        first_name: "Jean".into(),
        last_name: "Mukendi".into(),
        email: "jean.mukendi@renemico.com".into(),
        phone: "+243812345678".into(),
        level: UserLevel::Operator,
        photo: None,
        qrcode: None,
        is_verified: true,
    }
}

/// Semi-transparent grey PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 200]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}
