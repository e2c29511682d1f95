// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_domain::{Report, ReportScope};
use tracing::debug;

use crate::data_models::ReportRow;
use crate::diesel_schema::reports;
use crate::error::PersistenceError;
use crate::queries::scope::report_filter;

/// Loads a report by id, discarded or not.
///
/// # Errors
///
/// Returns `PersistenceError::ReportNotFound` if no such report exists.
pub fn get_report(conn: &mut SqliteConnection, report_id: i64) -> Result<Report, PersistenceError> {
    debug!(report_id, "Loading report");
    let row: Option<ReportRow> = reports::table
        .find(report_id)
        .select(ReportRow::as_select())
        .first(conn)
        .optional()?;
    row.ok_or(PersistenceError::ReportNotFound(report_id))?
        .into_report()
}

/// Lists the reports matched by `scope`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_reports(
    conn: &mut SqliteConnection,
    scope: &ReportScope,
) -> Result<Vec<Report>, PersistenceError> {
    let Some(filter) = report_filter(scope) else {
        debug!("Empty report scope, skipping query");
        return Ok(Vec::new());
    };

    let rows: Vec<ReportRow> = reports::table
        .filter(filter)
        .order(reports::report_id.asc())
        .select(ReportRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded scoped reports");

    rows.into_iter().map(ReportRow::into_report).collect()
}

/// Counts the reports whose reference starts with `prefix`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_report_references(
    conn: &mut SqliteConnection,
    prefix: &str,
) -> Result<i64, PersistenceError> {
    Ok(reports::table
        .filter(reports::reference.like(format!("{prefix}%")))
        .count()
        .get_result(conn)?)
}
