// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Communes, organizations and users.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{Commune, Organization, User};

use crate::data_models::{CommuneRow, OrganizationRow};
use crate::diesel_schema::{communes, organizations, user_form_types, users};
use crate::error::PersistenceError;

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_commune(conn: &mut SqliteConnection, commune: &Commune) -> Result<(), PersistenceError> {
    diesel::insert_into(communes::table)
        .values(CommuneRow::from(commune))
        .execute(conn)?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_organization(
    conn: &mut SqliteConnection,
    organization: &Organization,
) -> Result<(), PersistenceError> {
    diesel::insert_into(organizations::table)
        .values(OrganizationRow::from(organization))
        .execute(conn)?;
    Ok(())
}

/// Inserts a user and its form-admin types.
///
/// Office memberships are written with the offices.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_user(conn: &mut SqliteConnection, user: &User) -> Result<(), PersistenceError> {
    diesel::insert_into(users::table)
        .values((
            users::user_id.eq(user.user_id),
            users::organization_id.eq(user.organization_id),
            users::name.eq(&user.name),
            users::email.eq(&user.email),
            users::organization_admin.eq(user.organization_admin),
            users::super_admin.eq(user.super_admin),
        ))
        .execute(conn)?;

    for form_type in &user.form_admin_types {
        diesel::insert_into(user_form_types::table)
            .values((
                user_form_types::user_id.eq(user.user_id),
                user_form_types::form_type.eq(form_type.as_str()),
            ))
            .execute(conn)?;
    }
    Ok(())
}
