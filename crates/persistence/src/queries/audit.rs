// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements_audit::AuditEvent;

use crate::data_models::parse_timestamp;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AuditEventRow {
    event_id: i64,
    report_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        Ok(AuditEvent {
            event_id: Some(self.event_id),
            report_id: self.report_id,
            actor: serde_json::from_str(&self.actor_json)?,
            cause: serde_json::from_str(&self.cause_json)?,
            action: serde_json::from_str(&self.action_json)?,
            before: serde_json::from_str(&self.before_snapshot_json)?,
            after: serde_json::from_str(&self.after_snapshot_json)?,
            occurred_at: parse_timestamp(&self.occurred_at)?,
        })
    }
}

/// Lists the audit events of a report, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be decoded.
pub fn get_audit_trail(
    conn: &mut SqliteConnection,
    report_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::report_id.eq(report_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;
    rows.into_iter().map(AuditEventRow::into_event).collect()
}
