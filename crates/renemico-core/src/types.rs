// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain records for the RENEMICO registry: members, contributions, ledger
// operations, card duplicates and operator accounts.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Row identifier assigned by the store.
pub type RecordId = i64;

/// Placeholder printed in documents when a field was never filled in.
pub const NOT_PROVIDED: &str = "Non renseigné(e)";

/// Biological sex as recorded on the member card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Single-letter storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Masculin",
            Self::Female => "Féminin",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Membership category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Honor,
    Effective,
    Founder,
    CoFounder,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Honor,
        Category::Effective,
        Category::Founder,
        Category::CoFounder,
    ];

    /// Storage code, kept identical to the values already in the registry.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Honor => "Membre Honneur",
            Self::Effective => "Membre Effectif",
            Self::Founder => "Membre Fondateur",
            Self::CoFounder => "Membre Co-fondateur",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Honor => "Membre d'Honneur",
            Self::Effective => "Membre Effectif",
            Self::Founder => "Membre Fondateur",
            Self::CoFounder => "Membre Co-fondateur",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// The 26 provinces of the DRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Province {
    BasUele,
    Equateur,
    HautKatanga,
    HautLomami,
    HautUele,
    Ituri,
    Kasai,
    KasaiCentral,
    KasaiOriental,
    Kinshasa,
    KongoCentral,
    Kwango,
    Kwilu,
    Lomami,
    Lualaba,
    MaiNdombe,
    Maniema,
    Mongala,
    NordKivu,
    NordUbangi,
    Sankuru,
    SudKivu,
    SudUbangi,
    Tanganyika,
    Tshopo,
    Tshuapa,
}

impl Province {
    pub const ALL: [Province; 26] = [
        Province::BasUele,
        Province::Equateur,
        Province::HautKatanga,
        Province::HautLomami,
        Province::HautUele,
        Province::Ituri,
        Province::Kasai,
        Province::KasaiCentral,
        Province::KasaiOriental,
        Province::Kinshasa,
        Province::KongoCentral,
        Province::Kwango,
        Province::Kwilu,
        Province::Lomami,
        Province::Lualaba,
        Province::MaiNdombe,
        Province::Maniema,
        Province::Mongala,
        Province::NordKivu,
        Province::NordUbangi,
        Province::Sankuru,
        Province::SudKivu,
        Province::SudUbangi,
        Province::Tanganyika,
        Province::Tshopo,
        Province::Tshuapa,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::BasUele => "BAS-UELE",
            Self::Equateur => "EQUATEUR",
            Self::HautKatanga => "HAUT-KATANGA",
            Self::HautLomami => "HAUT-LOMAMI",
            Self::HautUele => "HAUT-UELE",
            Self::Ituri => "ITURI",
            Self::Kasai => "KASAI",
            Self::KasaiCentral => "KASAI-CENTRAL",
            Self::KasaiOriental => "KASAI-ORIENTAL",
            Self::Kinshasa => "KINSHASA",
            Self::KongoCentral => "KONGO-CENTRAL",
            Self::Kwango => "KWANGO",
            Self::Kwilu => "KWILU",
            Self::Lomami => "LOMAMI",
            Self::Lualaba => "LUALABA",
            Self::MaiNdombe => "MAI-NDOMBE",
            Self::Maniema => "MANIEMA",
            Self::Mongala => "MONGALA",
            Self::NordKivu => "NORD-KIVU",
            Self::NordUbangi => "NORD-UBANGI",
            Self::Sankuru => "SANKURU",
            Self::SudKivu => "SUD-KIVU",
            Self::SudUbangi => "SUD-UBANGI",
            Self::Tanganyika => "TANGANYIKA",
            Self::Tshopo => "TSHOPO",
            Self::Tshuapa => "TSHUAPA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BasUele => "Bas-Uele",
            Self::Equateur => "Équateur",
            Self::HautKatanga => "Haut-Katanga",
            Self::HautLomami => "Haut-Lomami",
            Self::HautUele => "Haut-Uele",
            Self::Ituri => "Ituri",
            Self::Kasai => "Kasaï",
            Self::KasaiCentral => "Kasaï-Central",
            Self::KasaiOriental => "Kasaï-Oriental",
            Self::Kinshasa => "Kinshasa",
            Self::KongoCentral => "Kongo-Central",
            Self::Kwango => "Kwango",
            Self::Kwilu => "Kwilu",
            Self::Lomami => "Lomami",
            Self::Lualaba => "Lualaba",
            Self::MaiNdombe => "Mai-Ndombe",
            Self::Maniema => "Maniema",
            Self::Mongala => "Mongala",
            Self::NordKivu => "Nord-Kivu",
            Self::NordUbangi => "Nord-Ubangi",
            Self::Sankuru => "Sankuru",
            Self::SudKivu => "Sud-Kivu",
            Self::SudUbangi => "Sud-Ubangi",
            Self::Tanganyika => "Tanganyika",
            Self::Tshopo => "Tshopo",
            Self::Tshuapa => "Tshuapa",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let wanted = code.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|p| p.code() == wanted)
    }
}

/// Soft state of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Active => "actif",
            Self::Inactive => "inactif",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Actif",
            Self::Inactive => "Inactif",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "actif" => Some(Self::Active),
            "inactif" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A registered member of the association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: RecordId,
    /// Unique, immutable once assigned.
    pub code: String,
    pub province: Province,
    pub category: Category,
    pub function: Option<String>,
    /// Sector of activity printed on the back of the card.
    pub site: Option<String>,
    pub nom: String,
    pub post_nom: String,
    pub prenom: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Encoded photo bytes (JPEG or PNG).
    pub photo: Option<Vec<u8>>,
    /// Committed QR code image (PNG).
    pub qrcode: Option<Vec<u8>>,
    pub registered_on: NaiveDate,
    pub updated_on: NaiveDate,
    /// Only ever moves forward, via reactivation.
    pub expires_on: NaiveDate,
    pub status: MemberStatus,
    pub profession: Option<String>,
    pub observations: Option<String>,
    pub card_renewed: bool,
}

impl Member {
    /// "NOM POST-NOM PRENOM".
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.nom, self.post_nom, self.prenom)
    }

    /// True once the expiration date lies strictly before `as_of`.
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expires_on < as_of
    }

    /// Case-insensitive search across the fields the member list filters on.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.nom.as_str(),
            self.post_nom.as_str(),
            self.prenom.as_str(),
            self.code.as_str(),
            self.province.code(),
            self.category.code(),
            self.status.code(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Member registration / edit form, before pre-save normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberForm {
    pub province: Province,
    pub category: Category,
    pub function: Option<String>,
    pub site: Option<String>,
    pub nom: String,
    pub post_nom: String,
    pub prenom: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub status: MemberStatus,
    pub profession: Option<String>,
    pub observations: Option<String>,
}

/// One monthly membership payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: RecordId,
    pub member_id: RecordId,
    /// Always the first day of the paid month.
    pub month: NaiveDate,
    pub amount: i64,
    pub paid_at: DateTime<Utc>,
}

impl Contribution {
    /// Invoice number surfaced to members: `COT-0042`.
    pub fn invoice_number(&self) -> String {
        format!("COT-{:04}", self.id)
    }
}

/// Direction of a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Money coming in.
    Entree,
    /// Money going out.
    Sortie,
}

impl OperationKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Entree => "ENTREE",
            Self::Sortie => "SORTIE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entree => "Entrée",
            Self::Sortie => "Sortie",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ENTREE" => Some(Self::Entree),
            "SORTIE" => Some(Self::Sortie),
            _ => None,
        }
    }
}

/// A general ledger entry, unrelated to any member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: RecordId,
    pub date: NaiveDate,
    pub motive: String,
    pub amount: Decimal,
    pub collected_by: String,
    pub kind: OperationKind,
}

/// Ledger entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationForm {
    pub date: NaiveDate,
    pub motive: String,
    pub amount: Decimal,
    pub collected_by: String,
    pub kind: OperationKind,
}

/// A reissued physical card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duplicata {
    pub id: RecordId,
    pub member_id: RecordId,
    pub created_at: DateTime<Utc>,
    /// Globally unique.
    pub card_number: String,
}

/// Hierarchical level of an operator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserLevel {
    NationalPresident,
    ProvincialPresident,
    SecretaryGeneral,
    Operator,
    SystemAdmin,
}

impl UserLevel {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NationalPresident => "PRESIDENT_NATIONAL",
            Self::ProvincialPresident => "PRESIDENT_PROVINCIAL",
            Self::SecretaryGeneral => "SECRETAIRE_GENERAL",
            Self::Operator => "OPERATEUR",
            Self::SystemAdmin => "ADMIN_SYSTEME",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NationalPresident => "Président National",
            Self::ProvincialPresident => "Président Provincial",
            Self::SecretaryGeneral => "Secrétaire Général",
            Self::Operator => "Opérateur(trice)",
            Self::SystemAdmin => "Administrateur Système",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PRESIDENT_NATIONAL" => Some(Self::NationalPresident),
            "PRESIDENT_PROVINCIAL" => Some(Self::ProvincialPresident),
            "SECRETAIRE_GENERAL" => Some(Self::SecretaryGeneral),
            "OPERATEUR" => Some(Self::Operator),
            "ADMIN_SYSTEME" => Some(Self::SystemAdmin),
            _ => None,
        }
    }
}

/// An operator account. Credentials and sessions live with the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Normalized `+243` followed by nine digits.
    pub phone: String,
    pub level: UserLevel,
    pub photo: Option<Vec<u8>>,
    pub qrcode: Option<Vec<u8>>,
    pub is_verified: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Operator account form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub level: UserLevel,
    pub photo: Option<Vec<u8>>,
}

/// Output formats produced by the document core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Xlsx,
    Png,
    Jpeg,
}

impl DocumentType {
    /// MIME type for the `Content-Type` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Infer an image type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// A paper size in a given orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFormat {
    pub paper: PaperSize,
    pub orientation: Orientation,
}

impl PageFormat {
    pub const A4_PORTRAIT: PageFormat = PageFormat {
        paper: PaperSize::A4,
        orientation: Orientation::Portrait,
    };
    pub const A4_LANDSCAPE: PageFormat = PageFormat {
        paper: PaperSize::A4,
        orientation: Orientation::Landscape,
    };

    /// Oriented dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.paper.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Oriented dimensions in PostScript points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (w * 72.0 / 25.4, h * 72.0 / 25.4)
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_six_provinces_round_trip_their_codes() {
        assert_eq!(Province::ALL.len(), 26);
        for province in Province::ALL {
            assert_eq!(Province::from_code(province.code()), Some(province));
        }
        assert_eq!(Province::from_code("lualaba"), Some(Province::Lualaba));
        assert!(Province::from_code("ATLANTIS").is_none());
    }

    #[test]
    fn invoice_number_is_zero_padded() {
        let c = Contribution {
            id: 42,
            member_id: 1,
            month: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            amount: 50,
            paid_at: Utc::now(),
        };
        assert_eq!(c.invoice_number(), "COT-0042");
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let (w, h) = PageFormat::A4_LANDSCAPE.dimensions_pt();
        assert!(w > h);
        assert!((w - 841.89).abs() < 0.1);
    }

    #[test]
    fn xlsx_mime_type() {
        assert_eq!(
            DocumentType::Xlsx.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(DocumentType::from_extension("JPEG"), Some(DocumentType::Jpeg));
    }
}
