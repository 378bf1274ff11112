// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RENEMICO — membership registry documents from the command line.
//
// Entry point. Initialises logging and the backend services, then produces
// the requested document into the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use renemico_app::{AppServices, RenderedDocument};
use renemico_core::error::{RenemicoError, Result};
use renemico_core::human_errors::humanize_error;
use renemico_core::{Member, RecordId};

#[derive(Parser)]
#[command(name = "renemico")]
#[command(about = "Cartes de membre, factures, historiques, rapports et exports RENEMICO")]
#[command(version)]
struct Cli {
    /// Data directory holding config.json, the database and assets
    #[arg(long, env = "RENEMICO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory the produced files are written into
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Reference date for expiry, periods and growth (default: today)
    #[arg(long, value_name = "AAAA-MM-JJ")]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Two-sided membership card
    Card {
        /// Member code or id
        member: String,
    },

    /// Reissue a membership card with a fresh QR code
    Renew {
        /// Member code or id
        member: String,
    },

    /// Invoice of one monthly contribution
    Invoice {
        /// Contribution id (the number in COT-0042)
        contribution: RecordId,
    },

    /// Contribution history of one member
    History {
        /// Member code or id
        member: String,

        /// Spreadsheet instead of PDF
        #[arg(long)]
        xlsx: bool,
    },

    /// Contribution history of every member
    HistoryAll,

    /// Ledger report for a period
    Report {
        /// journalier, mensuel, trimestriel, semestriel or annuel
        periode: String,
    },

    /// Operator card
    UserCard {
        username: String,
    },

    /// Spreadsheet export
    Export {
        #[arg(value_enum)]
        what: ExportKind,
    },

    /// Dashboard figures as JSON
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Members,
    Operations,
    HistoryAll,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            let human = humanize_error(&e);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let services = match cli.data_dir {
        Some(dir) => AppServices::open(dir)?,
        None => AppServices::init()?,
    };
    let as_of = cli.date.unwrap_or_else(|| Local::now().date_naive());
    tracing::info!(%as_of, data_dir = %services.data_dir().display(), "RENEMICO starting");

    let document = match cli.command {
        Commands::Card { member } => services.member_card(find_member(&services, &member)?.id)?,
        Commands::Renew { member } => {
            let member = find_member(&services, &member)?;
            services.member_card(services.renew_card(member.id, as_of)?.id)?
        }
        Commands::Invoice { contribution } => services.invoice(contribution)?,
        Commands::History { member, xlsx } => {
            let member = find_member(&services, &member)?;
            if xlsx {
                services.export_member_history(member.id)?
            } else {
                services.member_history(member.id, as_of)?
            }
        }
        Commands::HistoryAll => services.all_history(as_of)?,
        Commands::Report { periode } => services.ledger_report(&periode, as_of)?,
        Commands::UserCard { username } => {
            services.user_card(services.user_by_username(&username)?.id)?
        }
        Commands::Export { what } => match what {
            ExportKind::Members => services.export_members()?,
            ExportKind::Operations => services.export_operations()?,
            ExportKind::HistoryAll => services.export_all_history()?,
        },
        Commands::Stats => {
            let dashboard = services.dashboard(as_of)?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            return Ok(());
        }
    };
    write(&document, &cli.out)
}

/// Look a member up by code, then by numeric id.
fn find_member(services: &AppServices, key: &str) -> Result<Member> {
    match services.member_by_code(key) {
        Err(RenemicoError::NotFound { .. }) => match key.trim().parse::<RecordId>() {
            Ok(id) => services.member(id),
            Err(_) => Err(RenemicoError::not_found("member", key)),
        },
        found => found,
    }
}

fn write(document: &RenderedDocument, out: &std::path::Path) -> Result<()> {
    let path = document.write_into(out)?;
    println!("{}", path.display());
    Ok(())
}
