// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for ledger filtering, the all-members history join
// and the dashboard over a registry-sized data set.

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use renemico_core::{
    Category, Contribution, Member, MemberStatus, Operation, OperationKind, Province, Sex,
};
use renemico_finance::Period;
use renemico_finance::aggregate::{all_members_history, ledger_totals, operations_in};
use renemico_finance::stats::dashboard;

const MEMBERS: i64 = 500;
const MONTHS: u32 = 24;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn member(id: i64) -> Member {
    let registered = date(2023, 1 + (id % 12) as u32, 1);
    Member {
        id,
        code: format!("CODE{id:04}"),
        province: Province::ALL[(id as usize) % Province::ALL.len()],
        category: Category::ALL[(id as usize) % Category::ALL.len()],
        function: None,
        site: None,
        nom: format!("NOM{:03}", (id * 7919) % 1000),
        post_nom: "KABAMBA".into(),
        prenom: "JEAN".into(),
        sex: if id % 2 == 0 { Sex::Male } else { Sex::Female },
        birth_date: date(1980, 1, 1),
        birth_place: "KOLWEZI".into(),
        address: None,
        phone: None,
        email: None,
        photo: None,
        qrcode: None,
        registered_on: registered,
        updated_on: registered,
        expires_on: date(2026, 1 + (id % 12) as u32, 1),
        status: MemberStatus::Active,
        profession: None,
        observations: None,
        card_renewed: id % 5 == 0,
    }
}

fn contributions(members: &[Member]) -> Vec<Contribution> {
    let mut out = Vec::new();
    for m in members {
        for k in 0..MONTHS {
            let (y, mo) = (2024 + (k / 12) as i32, 1 + k % 12);
            out.push(Contribution {
                id: out.len() as i64 + 1,
                member_id: m.id,
                month: date(y, mo, 1),
                amount: 10 + (m.id % 40),
                paid_at: Utc
                    .with_ymd_and_hms(y, mo, 5, 10, 0, 0)
                    .single()
                    .unwrap_or_default(),
            });
        }
    }
    out
}

fn operations() -> Vec<Operation> {
    (0..2_000)
        .map(|i| Operation {
            id: i + 1,
            date: date(2024, 1, 1) + chrono::Days::new((i % 600) as u64),
            motive: format!("Opération {i}"),
            amount: Decimal::new(1_000 + i * 37, 2),
            collected_by: "CAISSIER".into(),
            kind: if i % 3 == 0 {
                OperationKind::Sortie
            } else {
                OperationKind::Entree
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_ledger(c: &mut Criterion) {
    let ops = operations();
    let as_of = date(2025, 8, 17);

    c.bench_function("ledger_totals_trimestriel", |b| {
        b.iter(|| {
            let selected = operations_in(black_box(&ops), Some(Period::Quarterly), as_of);
            ledger_totals(selected.iter().copied())
        });
    });

    c.bench_function("ledger_totals_all", |b| {
        b.iter(|| ledger_totals(black_box(&ops)));
    });
}

fn bench_history(c: &mut Criterion) {
    let members: Vec<Member> = (1..=MEMBERS).map(member).collect();
    let contributions = contributions(&members);

    c.bench_function("all_members_history_12k", |b| {
        b.iter(|| all_members_history(black_box(&members), black_box(&contributions)).len());
    });
}

fn bench_dashboard(c: &mut Criterion) {
    let members: Vec<Member> = (1..=MEMBERS).map(member).collect();
    let contributions = contributions(&members);
    let ops = operations();
    let as_of = date(2025, 8, 17);

    c.bench_function("dashboard", |b| {
        b.iter(|| {
            dashboard(
                black_box(&members),
                &[],
                black_box(&contributions),
                black_box(&ops),
                as_of,
            )
        });
    });
}

criterion_group!(benches, bench_ledger, bench_history, bench_dashboard);
criterion_main!(benches);
