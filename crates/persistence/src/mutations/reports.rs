// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::Report;

use crate::backend::get_last_insert_rowid;
use crate::data_models::ReportWrite;
use crate::diesel_schema::reports;
use crate::error::PersistenceError;

/// Inserts a new report and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. on a duplicate reference.
pub fn insert_report(conn: &mut SqliteConnection, report: &Report) -> Result<i64, PersistenceError> {
    diesel::insert_into(reports::table)
        .values(ReportWrite::from_report(report)?)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Overwrites a report if its stored version is still `expected_version`.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the row was modified since it
/// was read, or a database error.
pub fn compare_and_swap_report(
    conn: &mut SqliteConnection,
    expected_version: i64,
    report: &Report,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        reports::table
            .filter(reports::report_id.eq(report.report_id))
            .filter(reports::lock_version.eq(expected_version)),
    )
    .set(ReportWrite::from_report(report)?)
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StaleWrite {
            report_id: report.report_id,
            expected_version,
        });
    }
    Ok(())
}
