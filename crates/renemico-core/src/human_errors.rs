// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// French, user-facing messages for every error an operator can run into.
//
// The HTTP layer uses `status` to choose a response code; `message` and
// `suggestion` go straight into the flash area of the page.

use crate::error::RenemicoError;

/// A user-facing error with an actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Short summary shown as a heading.
    pub message: String,
    /// What the operator should try next.
    pub suggestion: String,
    /// 404, 409, 422 or 500.
    pub status: u16,
}

/// Convert a `RenemicoError` into something an operator can act on.
pub fn humanize_error(err: &RenemicoError) -> HumanError {
    match err {
        RenemicoError::NotFound { entity, .. } => HumanError {
            message: format!("{} introuvable.", entity_label(entity)),
            suggestion: "L'élément a peut-être été supprimé. Revenez à la liste et réessayez.".into(),
            status: 404,
        },

        RenemicoError::Validation(field) => HumanError {
            message: field.reason.clone(),
            suggestion: format!("Corrigez le champ « {} » puis enregistrez à nouveau.", field.field),
            status: 422,
        },

        RenemicoError::CardStillValid { until } => HumanError {
            message: format!(
                "La carte est encore valide jusqu'au {}. Elle ne peut pas être réactivée.",
                until.format("%d/%m/%Y")
            ),
            suggestion: "Pour remplacer une carte perdue ou abîmée, créez un duplicata.".into(),
            status: 409,
        },

        RenemicoError::PdfError(_) | RenemicoError::RenderFailed { .. } => HumanError {
            message: "Erreur lors de la génération du document.".into(),
            suggestion: "Réessayez. Si le problème persiste, contactez l'administrateur.".into(),
            status: 500,
        },

        RenemicoError::ImageError(_) => HumanError {
            message: "L'image n'a pas pu être traitée.".into(),
            suggestion: "Enregistrez la photo au format JPEG ou PNG puis téléversez-la à nouveau.".into(),
            status: 422,
        },

        RenemicoError::QrError(_) => HumanError {
            message: "Le code QR n'a pas pu être généré.".into(),
            suggestion: "Réessayez. Si le problème persiste, contactez l'administrateur.".into(),
            status: 500,
        },

        RenemicoError::ExportError(_) => HumanError {
            message: "Erreur lors de l'export du fichier Excel.".into(),
            suggestion: "Réessayez dans quelques instants.".into(),
            status: 500,
        },

        RenemicoError::Database(_) => HumanError {
            message: "La base de données a rencontré un problème.".into(),
            suggestion: "Réessayez. Vos données déjà enregistrées ne sont pas perdues.".into(),
            status: 500,
        },

        RenemicoError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => HumanError {
            message: "Le fichier demandé est introuvable.".into(),
            suggestion: "Vérifiez le chemin du fichier puis réessayez.".into(),
            status: 404,
        },

        RenemicoError::Io(_) | RenemicoError::Serialization(_) => HumanError {
            message: "Erreur interne lors de la lecture ou de l'écriture d'un fichier.".into(),
            suggestion: "Réessayez. Si le problème persiste, signalez-le.".into(),
            status: 500,
        },
    }
}

fn entity_label(entity: &str) -> &str {
    match entity {
        "member" => "Membre",
        "contribution" => "Cotisation",
        "operation" => "Opération",
        "duplicata" => "Duplicata",
        "user" => "Utilisateur",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use chrono::NaiveDate;

    #[test]
    fn not_found_is_404() {
        let err = RenemicoError::not_found("member", 7);
        let human = humanize_error(&err);
        assert_eq!(human.status, 404);
        assert_eq!(human.message, "Membre introuvable.");
    }

    #[test]
    fn validation_carries_field_reason() {
        let err = RenemicoError::Validation(FieldError::new(
            "month",
            "Cette contribution pour ce mois existe déjà.",
        ));
        let human = humanize_error(&err);
        assert_eq!(human.status, 422);
        assert_eq!(human.message, "Cette contribution pour ce mois existe déjà.");
        assert!(human.suggestion.contains("month"));
    }

    #[test]
    fn still_valid_card_points_to_duplicata() {
        let err = RenemicoError::CardStillValid {
            until: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.status, 409);
        assert!(human.message.contains("01/03/2027"));
        assert!(human.suggestion.contains("duplicata"));
    }

    #[test]
    fn render_failures_are_generic() {
        let err = RenemicoError::RenderFailed {
            document: "invoice",
            reason: "font table missing".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.status, 500);
        assert!(!human.message.contains("font"));
    }
}
