// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{Package, PackageScope};
use tracing::debug;

use crate::data_models::PackageRow;
use crate::diesel_schema::packages;
use crate::error::PersistenceError;
use crate::queries::scope::package_filter;

/// Lists the packages matched by `scope`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_packages(
    conn: &mut SqliteConnection,
    scope: &PackageScope,
) -> Result<Vec<Package>, PersistenceError> {
    let Some(filter) = package_filter(scope) else {
        debug!("Empty package scope, skipping query");
        return Ok(Vec::new());
    };

    let rows: Vec<PackageRow> = packages::table
        .filter(filter)
        .order(packages::package_id.asc())
        .select(PackageRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PackageRow::into_package).collect()
}

/// Loads a package by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such package exists.
pub fn get_package(conn: &mut SqliteConnection, package_id: i64) -> Result<Package, PersistenceError> {
    let row: Option<PackageRow> = packages::table
        .find(package_id)
        .select(PackageRow::as_select())
        .first(conn)
        .optional()?;
    row.ok_or_else(|| PersistenceError::NotFound(format!("package {package_id}")))?
        .into_package()
}

/// Counts the packages whose reference starts with `prefix`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_package_references(
    conn: &mut SqliteConnection,
    prefix: &str,
) -> Result<i64, PersistenceError> {
    Ok(packages::table
        .filter(packages::reference.like(format!("{prefix}%")))
        .count()
        .get_result(conn)?)
}
