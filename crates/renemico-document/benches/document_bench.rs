// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the renemico-document crate: French number-to-words
// and a full invoice render.

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use renemico_core::{Category, Contribution, Member, MemberStatus, Province, Sex};
use renemico_document::{RenderContext, amount_in_words, number_to_words, render_invoice};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn member() -> Member {
    let day = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    Member {
        id: 1,
        code: "AB12CD34".into(),
        province: Province::Lualaba,
        category: Category::Effective,
        function: Some("NEGOCIANT".into()),
        site: Some("KOLWEZI".into()),
        nom: "MUKENDI".into(),
        post_nom: "KABAMBA".into(),
        prenom: "JEAN".into(),
        sex: Sex::Male,
        birth_date: NaiveDate::from_ymd_opt(1980, 5, 12).unwrap(),
        birth_place: "LIKASI".into(),
        address: Some("12, Avenue Mutoshi, Kolwezi".into()),
        phone: Some("+243812345678".into()),
        email: None,
        photo: None,
        qrcode: None,
        registered_on: day,
        updated_on: day,
        expires_on: NaiveDate::from_ymd_opt(2028, 8, 1).unwrap(),
        status: MemberStatus::Active,
        profession: None,
        observations: None,
        card_renewed: false,
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Mixed magnitudes, including the 70-99 forms and a decimal part.
fn bench_number_to_words(c: &mut Criterion) {
    let values = [0.0, 71.0, 99.0, 180.0, 1_997.0, 2_000_000.0, 1_234_567.89];
    c.bench_function("number_to_words (7 values)", |b| {
        b.iter(|| {
            for v in values {
                black_box(number_to_words(black_box(v)));
            }
        });
    });

    let amount = Decimal::new(123_456, 2);
    c.bench_function("amount_in_words", |b| {
        b.iter(|| black_box(amount_in_words(black_box(amount), "dollars américains")));
    });
}

/// One-page invoice with QR code and no branding assets.
fn bench_invoice(c: &mut Criterion) {
    let ctx = RenderContext::default();
    let member = member();
    let contribution = Contribution {
        id: 42,
        member_id: 1,
        month: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        amount: 50,
        paid_at: Utc.with_ymd_and_hms(2025, 8, 5, 10, 0, 0).unwrap(),
    };

    c.bench_function("render_invoice", |b| {
        b.iter(|| {
            let out = render_invoice(&ctx, black_box(&contribution), &member).unwrap();
            black_box(out.bytes.len());
        });
    });
}

criterion_group!(benches, bench_number_to_words, bench_invoice);
criterion_main!(benches);
