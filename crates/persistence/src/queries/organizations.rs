// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{FormType, Organization, User};
use tracing::debug;

use crate::data_models::OrganizationRow;
use crate::diesel_schema::{office_users, organizations, user_form_types, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserRow {
    user_id: i64,
    organization_id: i64,
    name: String,
    email: String,
    organization_admin: bool,
    super_admin: bool,
}

/// Loads an organization by id.
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such organization exists.
pub fn get_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<Organization, PersistenceError> {
    let row: OrganizationRow = organizations::table
        .find(organization_id)
        .select(OrganizationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::OrganizationNotFound(organization_id))?;
    row.into_organization()
}

/// Loads a user with its form-admin types and office memberships.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if no such user exists.
pub fn get_user(conn: &mut SqliteConnection, user_id: i64) -> Result<User, PersistenceError> {
    debug!(user_id, "Loading user");
    let row: UserRow = users::table
        .find(user_id)
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::UserNotFound(user_id))?;

    let form_admin_types: BTreeSet<FormType> = user_form_types::table
        .filter(user_form_types::user_id.eq(user_id))
        .select(user_form_types::form_type)
        .load::<String>(conn)?
        .iter()
        .map(|name| name.parse::<FormType>())
        .collect::<Result<_, _>>()?;

    let office_ids: BTreeSet<i64> = office_users::table
        .filter(office_users::user_id.eq(user_id))
        .select(office_users::office_id)
        .load::<i64>(conn)?
        .into_iter()
        .collect();

    Ok(User {
        user_id: row.user_id,
        organization_id: row.organization_id,
        name: row.name,
        email: row.email,
        organization_admin: row.organization_admin,
        super_admin: row.super_admin,
        form_admin_types,
        office_ids,
    })
}
