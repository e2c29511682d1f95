// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{Commune, OrganizationKind, Territory};
use tracing::debug;

use crate::data_models::CommuneRow;
use crate::diesel_schema::{communes, organizations};
use crate::error::PersistenceError;

/// Loads the commune index and the DDFIP serving each departement.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_territory(conn: &mut SqliteConnection) -> Result<Territory, PersistenceError> {
    let mut territory: Territory = Territory::new();

    let rows: Vec<CommuneRow> = communes::table
        .select(CommuneRow::as_select())
        .load(conn)?;
    for row in rows {
        territory.add_commune(Commune::from(row));
    }

    let ddfips: Vec<(i64, Option<String>)> = organizations::table
        .filter(organizations::kind.eq(OrganizationKind::Ddfip.as_str()))
        .select((organizations::organization_id, organizations::code_departement))
        .load(conn)?;
    for (ddfip_id, code_departement) in ddfips {
        if let Some(code_departement) = code_departement {
            territory.add_ddfip(&code_departement, ddfip_id);
        }
    }

    debug!(communes = territory.commune_count(), "Loaded territory");
    Ok(territory)
}
