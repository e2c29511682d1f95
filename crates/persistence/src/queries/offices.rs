// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{FormType, Office};
use tracing::debug;

use crate::diesel_schema::{office_competences, office_territories, office_users, offices};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = offices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OfficeRow {
    office_id: i64,
    ddfip_id: i64,
    name: String,
}

fn hydrate_office(conn: &mut SqliteConnection, row: OfficeRow) -> Result<Office, PersistenceError> {
    let competences: BTreeSet<FormType> = office_competences::table
        .filter(office_competences::office_id.eq(row.office_id))
        .select(office_competences::form_type)
        .load::<String>(conn)?
        .iter()
        .map(|name| name.parse::<FormType>())
        .collect::<Result<_, _>>()?;

    let territories: Vec<(String, String)> = office_territories::table
        .filter(office_territories::office_id.eq(row.office_id))
        .select((office_territories::kind, office_territories::code))
        .load(conn)?;

    let member_ids: BTreeSet<i64> = office_users::table
        .filter(office_users::office_id.eq(row.office_id))
        .select(office_users::user_id)
        .load::<i64>(conn)?
        .into_iter()
        .collect();

    let mut office: Office = Office {
        office_id: row.office_id,
        ddfip_id: row.ddfip_id,
        name: row.name,
        competences,
        communes: BTreeSet::new(),
        epcis: BTreeSet::new(),
        departements: BTreeSet::new(),
        member_ids,
    };
    for (kind, code) in territories {
        match kind.as_str() {
            "commune" => office.communes.insert(code),
            "epci" => office.epcis.insert(code),
            "departement" => office.departements.insert(code),
            other => {
                return Err(PersistenceError::InvalidStoredValue(format!(
                    "unknown office territory kind '{other}'"
                )));
            }
        };
    }
    Ok(office)
}

/// Loads an office with its competences, territory and members.
///
/// # Errors
///
/// Returns `PersistenceError::OfficeNotFound` if no such office exists.
pub fn get_office(conn: &mut SqliteConnection, office_id: i64) -> Result<Office, PersistenceError> {
    debug!(office_id, "Loading office");
    let row: OfficeRow = offices::table
        .find(office_id)
        .select(OfficeRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::OfficeNotFound(office_id))?;
    hydrate_office(conn, row)
}

/// Lists the offices of a DDFIP, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_offices_for_ddfip(
    conn: &mut SqliteConnection,
    ddfip_id: i64,
) -> Result<Vec<Office>, PersistenceError> {
    let rows: Vec<OfficeRow> = offices::table
        .filter(offices::ddfip_id.eq(ddfip_id))
        .order(offices::office_id.asc())
        .select(OfficeRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(|row| hydrate_office(conn, row))
        .collect()
}
