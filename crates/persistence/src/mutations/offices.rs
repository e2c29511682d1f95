// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{FormType, Office};

use crate::diesel_schema::{office_competences, office_territories, office_users, offices};
use crate::error::PersistenceError;

/// Inserts an office with its competences, territory and members.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_office(conn: &mut SqliteConnection, office: &Office) -> Result<(), PersistenceError> {
    diesel::insert_into(offices::table)
        .values((
            offices::office_id.eq(office.office_id),
            offices::ddfip_id.eq(office.ddfip_id),
            offices::name.eq(&office.name),
        ))
        .execute(conn)?;

    replace_competences(conn, office.office_id, &office.competences)?;
    replace_members(conn, office.office_id, &office.member_ids)?;

    let territory = office
        .communes
        .iter()
        .map(|code| ("commune", code))
        .chain(office.epcis.iter().map(|code| ("epci", code)))
        .chain(office.departements.iter().map(|code| ("departement", code)));
    for (kind, code) in territory {
        diesel::insert_into(office_territories::table)
            .values((
                office_territories::office_id.eq(office.office_id),
                office_territories::kind.eq(kind),
                office_territories::code.eq(code),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Replaces the competences of an office.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn replace_competences(
    conn: &mut SqliteConnection,
    office_id: i64,
    competences: &BTreeSet<FormType>,
) -> Result<(), PersistenceError> {
    diesel::delete(office_competences::table.filter(office_competences::office_id.eq(office_id)))
        .execute(conn)?;
    for form_type in competences {
        diesel::insert_into(office_competences::table)
            .values((
                office_competences::office_id.eq(office_id),
                office_competences::form_type.eq(form_type.as_str()),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Replaces the members of an office.
///
/// # Errors
///
/// Returns an error if a statement fails, e.g. an unknown user id.
pub fn replace_members(
    conn: &mut SqliteConnection,
    office_id: i64,
    member_ids: &BTreeSet<i64>,
) -> Result<(), PersistenceError> {
    diesel::delete(office_users::table.filter(office_users::office_id.eq(office_id)))
        .execute(conn)?;
    for user_id in member_ids {
        diesel::insert_into(office_users::table)
            .values((
                office_users::office_id.eq(office_id),
                office_users::user_id.eq(*user_id),
            ))
            .execute(conn)?;
    }
    Ok(())
}
