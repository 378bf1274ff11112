// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator accounts.

use rusqlite::{OptionalExtension, params};
use tracing::{info, instrument};

use renemico_core::error::{RenemicoError, Result};
use renemico_core::{RecordId, User, UserLevel};

use crate::codec::coded;
use crate::registry::{Registry, db};

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, phone, level, photo, qrcode, is_verified";

impl Registry {
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn insert_user(&self, user: &User) -> Result<RecordId> {
        self.conn
            .execute(
                "INSERT INTO users (username, first_name, last_name, email, phone, level, photo,
                 qrcode, is_verified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    user.username,
                    user.first_name,
                    user.last_name,
                    user.email,
                    user.phone,
                    user.level.code(),
                    user.photo,
                    user.qrcode,
                    user.is_verified,
                ],
            )
            .map_err(db("insert user"))?;
        let id = self.conn.last_insert_rowid();
        info!(user_id = id, "user inserted");
        Ok(id)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn update_user(&self, user: &User) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE users SET username = ?1, first_name = ?2, last_name = ?3, email = ?4,
                 phone = ?5, level = ?6, photo = ?7, qrcode = ?8, is_verified = ?9
                 WHERE id = ?10",
                params![
                    user.username,
                    user.first_name,
                    user.last_name,
                    user.email,
                    user.phone,
                    user.level.code(),
                    user.photo,
                    user.qrcode,
                    user.is_verified,
                    user.id,
                ],
            )
            .map_err(db("update user"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("user", user.id));
        }
        Ok(())
    }

    pub fn get_user(&self, id: RecordId) -> Result<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .optional()
            .map_err(db("get user"))
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![username],
                row_to_user,
            )
            .optional()
            .map_err(db("find user"))
    }

    pub fn username_taken(&self, username: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                params![username],
                |r| r.get(0),
            )
            .map_err(db("check username"))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY last_name, first_name, id"
            ))
            .map_err(db("prepare list users"))?;
        stmt.query_map([], row_to_user)
            .map_err(db("query list users"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db("collect users"))
    }

    pub fn delete_user(&self, id: RecordId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(db("delete user"))?;
        if rows == 0 {
            return Err(RenemicoError::not_found("user", id));
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        level: coded(row, 6, UserLevel::from_code)?,
        photo: row.get(7)?,
        qrcode: row.get(8)?,
        is_verified: row.get(9)?,
    })
}
