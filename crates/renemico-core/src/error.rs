// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for RENEMICO.

use chrono::NaiveDate;
use thiserror::Error;

/// A rejected field value: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Top-level error type for all RENEMICO operations.
#[derive(Debug, Error)]
pub enum RenemicoError {
    // -- Lookup / validation --
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),

    #[error("card is still valid until {until}")]
    CardStillValid { until: NaiveDate },

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("QR code generation failed: {0}")]
    QrError(String),

    #[error("spreadsheet export failed: {0}")]
    ExportError(String),

    #[error("rendering {document} failed: {reason}")]
    RenderFailed {
        document: &'static str,
        reason: String,
    },

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RenemicoError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation(FieldError::new(field, reason))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RenemicoError>;
