// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Member records.

use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

use renemico_core::error::{RenemicoError, Result};
use renemico_core::{Category, Member, MemberStatus, Province, RecordId, Sex};

use crate::codec::{coded, date, date_to_sql};
use crate::registry::{Registry, db};

const MEMBER_COLUMNS: &str = "id, code, province, category, function, site, nom, post_nom, \
     prenom, sex, birth_date, birth_place, address, phone, email, photo, qrcode, \
     registered_on, updated_on, expires_on, status, profession, observations, card_renewed";

impl Registry {
    /// Insert a new member and return its id. The member's own `id` is ignored.
    #[instrument(skip(self, member), fields(code = %member.code))]
    pub fn insert_member(&self, member: &Member) -> Result<RecordId> {
        self.conn
            .execute(
                "INSERT INTO members (code, province, category, function, site, nom, post_nom,
                 prenom, sex, birth_date, birth_place, address, phone, email, photo, qrcode,
                 registered_on, updated_on, expires_on, status, profession, observations,
                 card_renewed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                 ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
                params![
                    member.code,
                    member.province.code(),
                    member.category.code(),
                    member.function,
                    member.site,
                    member.nom,
                    member.post_nom,
                    member.prenom,
                    member.sex.code(),
                    date_to_sql(member.birth_date),
                    member.birth_place,
                    member.address,
                    member.phone,
                    member.email,
                    member.photo,
                    member.qrcode,
                    date_to_sql(member.registered_on),
                    date_to_sql(member.updated_on),
                    date_to_sql(member.expires_on),
                    member.status.code(),
                    member.profession,
                    member.observations,
                    member.card_renewed,
                ],
            )
            .map_err(db("insert member"))?;

        let id = self.conn.last_insert_rowid();
        info!(member_id = id, "member inserted");
        Ok(id)
    }

    /// Overwrite every column of an existing member.
    #[instrument(skip(self, member), fields(member_id = member.id))]
    pub fn update_member(&self, member: &Member) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE members SET code = ?1, province = ?2, category = ?3, function = ?4,
                 site = ?5, nom = ?6, post_nom = ?7, prenom = ?8, sex = ?9, birth_date = ?10,
                 birth_place = ?11, address = ?12, phone = ?13, email = ?14, photo = ?15,
                 qrcode = ?16, registered_on = ?17, updated_on = ?18, expires_on = ?19,
                 status = ?20, profession = ?21, observations = ?22, card_renewed = ?23
                 WHERE id = ?24",
                params![
                    member.code,
                    member.province.code(),
                    member.category.code(),
                    member.function,
                    member.site,
                    member.nom,
                    member.post_nom,
                    member.prenom,
                    member.sex.code(),
                    date_to_sql(member.birth_date),
                    member.birth_place,
                    member.address,
                    member.phone,
                    member.email,
                    member.photo,
                    member.qrcode,
                    date_to_sql(member.registered_on),
                    date_to_sql(member.updated_on),
                    date_to_sql(member.expires_on),
                    member.status.code(),
                    member.profession,
                    member.observations,
                    member.card_renewed,
                    member.id,
                ],
            )
            .map_err(db("update member"))?;

        if rows == 0 {
            return Err(RenemicoError::not_found("member", member.id));
        }
        debug!("member updated");
        Ok(())
    }

    /// Store a freshly rendered QR image. Last write wins.
    #[instrument(skip(self, png), fields(bytes = png.len()))]
    pub fn set_member_qrcode(&self, id: RecordId, png: &[u8]) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE members SET qrcode = ?1 WHERE id = ?2",
                params![png, id],
            )
            .map_err(db("update member qrcode"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("member", id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn get_member(&self, id: RecordId) -> Result<Option<Member>> {
        self.conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"),
                params![id],
                row_to_member,
            )
            .optional()
            .map_err(db("get member"))
    }

    #[instrument(skip(self))]
    pub fn find_member_by_code(&self, code: &str) -> Result<Option<Member>> {
        self.conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE code = ?1"),
                params![code],
                row_to_member,
            )
            .optional()
            .map_err(db("find member by code"))
    }

    /// Whether `code` is already attributed.
    pub fn member_code_taken(&self, code: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM members WHERE code = ?1)",
                params![code],
                |r| r.get(0),
            )
            .map_err(db("check member code"))
    }

    /// Every member, by last name then first name.
    #[instrument(skip(self))]
    pub fn list_members(&self) -> Result<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {MEMBER_COLUMNS} FROM members ORDER BY nom, prenom, id"
            ))
            .map_err(db("prepare list members"))?;

        let members = stmt
            .query_map([], row_to_member)
            .map_err(db("query list members"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect members"))?;

        debug!(count = members.len(), "retrieved members");
        Ok(members)
    }

    /// Members whose code or names contain `query`, ignoring case.
    pub fn search_members(&self, query: &str) -> Result<Vec<Member>> {
        Ok(self
            .list_members()?
            .into_iter()
            .filter(|m| m.matches(query))
            .collect())
    }

    /// Delete a member along with its contributions and duplicatas.
    #[instrument(skip(self))]
    pub fn delete_member(&self, id: RecordId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM members WHERE id = ?1", params![id])
            .map_err(db("delete member"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("member", id));
        }
        info!(member_id = id, "member deleted");
        Ok(())
    }
}

/// Column order follows `MEMBER_COLUMNS`.
fn row_to_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        code: row.get(1)?,
        province: coded(row, 2, Province::from_code)?,
        category: coded(row, 3, Category::from_code)?,
        function: row.get(4)?,
        site: row.get(5)?,
        nom: row.get(6)?,
        post_nom: row.get(7)?,
        prenom: row.get(8)?,
        sex: coded(row, 9, Sex::from_code)?,
        birth_date: date(row, 10)?,
        birth_place: row.get(11)?,
        address: row.get(12)?,
        phone: row.get(13)?,
        email: row.get(14)?,
        photo: row.get(15)?,
        qrcode: row.get(16)?,
        registered_on: date(row, 17)?,
        updated_on: date(row, 18)?,
        expires_on: date(row, 19)?,
        status: coded(row, 20, MemberStatus::from_code)?,
        profession: row.get(21)?,
        observations: row.get(22)?,
        card_renewed: row.get(23)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn member(code: &str, nom: &str) -> Member {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        Member {
            id: 0,
            code: code.into(),
            province: Province::HautKatanga,
            category: Category::Founder,
            function: Some("NEGOCIANT".into()),
            site: None,
            nom: nom.into(),
            post_nom: "KABAMBA".into(),
            prenom: "JEAN".into(),
            sex: Sex::Female,
            birth_date: d(1985, 1, 31),
            birth_place: "LUBUMBASHI".into(),
            address: None,
            phone: Some("+243812345678".into()),
            email: None,
            photo: Some(vec![1, 2, 3]),
            qrcode: None,
            registered_on: d(2025, 3, 4),
            updated_on: d(2025, 3, 4),
            expires_on: d(2028, 3, 4),
            status: MemberStatus::Active,
            profession: None,
            observations: Some("RAS".into()),
            card_renewed: false,
        }
    }

    #[test]
    fn insert_and_read_back() {
        let registry = Registry::open_in_memory().unwrap();
        let id = registry.insert_member(&member("AB12CD34", "MUKENDI")).unwrap();
        let stored = registry.get_member(id).unwrap().unwrap();
        assert_eq!(stored, Member { id, ..member("AB12CD34", "MUKENDI") });
        assert_eq!(
            registry.find_member_by_code("AB12CD34").unwrap().map(|m| m.id),
            Some(id)
        );
        assert!(registry.member_code_taken("AB12CD34").unwrap());
        assert!(!registry.member_code_taken("ZZZZZZZZ").unwrap());
    }

    #[test]
    fn duplicate_code_is_a_validation_error() {
        let registry = Registry::open_in_memory().unwrap();
        registry.insert_member(&member("AB12CD34", "MUKENDI")).unwrap();
        let err = registry
            .insert_member(&member("AB12CD34", "ILUNGA"))
            .unwrap_err();
        assert!(matches!(err, RenemicoError::Validation(ref f) if f.field == "code"));
    }

    #[test]
    fn update_and_qrcode() {
        let registry = Registry::open_in_memory().unwrap();
        let id = registry.insert_member(&member("AB12CD34", "MUKENDI")).unwrap();
        let mut m = registry.get_member(id).unwrap().unwrap();
        m.status = MemberStatus::Inactive;
        m.card_renewed = true;
        registry.update_member(&m).unwrap();
        registry.set_member_qrcode(id, &[9, 9]).unwrap();

        let stored = registry.get_member(id).unwrap().unwrap();
        assert_eq!(stored.status, MemberStatus::Inactive);
        assert!(stored.card_renewed);
        assert_eq!(stored.qrcode, Some(vec![9, 9]));

        assert!(matches!(
            registry.set_member_qrcode(999, &[1]),
            Err(RenemicoError::NotFound { .. })
        ));
    }

    #[test]
    fn listing_is_alphabetical_and_searchable() {
        let registry = Registry::open_in_memory().unwrap();
        registry.insert_member(&member("CODE0001", "MWAMBA")).unwrap();
        registry.insert_member(&member("CODE0002", "ILUNGA")).unwrap();
        let names: Vec<String> = registry
            .list_members()
            .unwrap()
            .into_iter()
            .map(|m| m.nom)
            .collect();
        assert_eq!(names, ["ILUNGA", "MWAMBA"]);
        assert_eq!(registry.search_members("mwam").unwrap().len(), 1);
    }

    #[test]
    fn delete_missing_member_is_not_found() {
        let registry = Registry::open_in_memory().unwrap();
        assert!(matches!(
            registry.delete_member(42),
            Err(RenemicoError::NotFound { .. })
        ));
        assert!(registry.get_member(42).unwrap().is_none());
    }
}
