// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use serde::{Deserialize, Serialize};
use signalements_domain::{Report, ReportState};
use time::OffsetDateTime;

/// Represents the entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "system").
    pub actor_type: String,
    /// The organization the actor acted for, if any.
    pub organization_id: Option<i64>,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            organization_id: None,
        }
    }

    /// Creates the actor for a platform user acting for an organization.
    #[must_use]
    pub fn user(user_id: i64, organization_id: i64) -> Self {
        Self {
            id: user_id.to_string(),
            actor_type: String::from("user"),
            organization_id: Some(organization_id),
        }
    }

    /// Creates the actor used for seeding and maintenance tasks.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`Assign`", "`Transmit`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The audited part of a report at a point in time.
///
/// A report that does not exist yet is represented by [`StateSnapshot::absent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: Option<ReportState>,
    pub office_id: Option<i64>,
    pub package_reference: Option<String>,
    pub discarded: bool,
    pub lock_version: i64,
}

impl StateSnapshot {
    /// Captures the audited fields of `report`.
    #[must_use]
    pub fn of(report: &Report) -> Self {
        Self {
            state: Some(report.state),
            office_id: report.office_id,
            package_reference: report.package_reference.clone(),
            discarded: report.is_discarded(),
            lock_version: report.lock_version,
        }
    }

    /// The snapshot preceding a report's creation.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            state: None,
            office_id: None,
            package_reference: None,
            discarded: false,
            lock_version: 0,
        }
    }
}

/// An immutable audit event describing one write to a report.
///
/// Every applied change produces exactly one event. Requests that change
/// nothing produce none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Assigned by persistence; `None` until stored.
    pub event_id: Option<i64>,
    /// `None` only for a report that has not been stored yet.
    pub report_id: Option<i64>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        report_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            report_id,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    /// Returns a copy of this event bound to a stored report.
    #[must_use]
    pub fn for_report(mut self, report_id: i64) -> Self {
        self.report_id = Some(report_id);
        self
    }
}
