// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::Package;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{NewPackageRow, format_timestamp};
use crate::diesel_schema::packages;
use crate::error::PersistenceError;

/// Inserts a package and returns its id. `package.package_id` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. on a duplicate reference.
pub fn insert_package(conn: &mut SqliteConnection, package: &Package) -> Result<i64, PersistenceError> {
    diesel::insert_into(packages::table)
        .values(NewPackageRow {
            reference: package.reference.clone(),
            origin: package.origin.as_str().to_string(),
            collectivity_id: package.collectivity_id,
            publisher_id: package.publisher_id,
            ddfip_id: package.ddfip_id,
            sandbox: package.sandbox,
            transmitted_at: format_timestamp(package.transmitted_at)?,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
