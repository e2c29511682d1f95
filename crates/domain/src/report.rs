// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::report_state::ReportState;
use crate::territory::Territory;
use crate::types::{FormType, Origin, Priority};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single anomaly observation travelling from a collectivity to a DDFIP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: i64,
    pub reference: String,

    pub origin: Origin,
    pub collectivity_id: i64,
    /// Set when a publisher created the report through the API.
    pub publisher_id: Option<i64>,
    /// Test transmission, never delivered for real processing.
    pub sandbox: bool,

    /// INSEE code of the commune the anomaly is located in.
    pub commune: String,
    pub form_type: FormType,
    pub priority: Priority,
    pub note: Option<String>,

    pub state: ReportState,
    pub ddfip_id: Option<i64>,
    pub office_id: Option<i64>,
    pub package_reference: Option<String>,

    pub resolution_motif: Option<String>,
    pub reponse: Option<String>,
    pub rejection_reason: Option<String>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ready_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub transmitted_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub accepted_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub assigned_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub canceled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub rejected_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub discarded_at: Option<OffsetDateTime>,

    /// Optimistic concurrency counter, bumped by every write.
    pub lock_version: i64,
}

impl Report {
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        self.discarded_at.is_some()
    }

    /// Returns the DDFIP responsible for the report.
    ///
    /// Once transmitted the DDFIP is stored on the report; before that it is
    /// derived from the commune's departement.
    ///
    /// # Errors
    ///
    /// Returns an error if the commune cannot be resolved to a DDFIP.
    pub fn ddfip(&self, territory: &Territory) -> Result<i64, DomainError> {
        match self.ddfip_id {
            Some(ddfip_id) => Ok(ddfip_id),
            None => territory.ddfip_for_commune(&self.commune),
        }
    }
}

/// Data supplied by the creator of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    pub origin: Origin,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    #[serde(default)]
    pub sandbox: bool,
    pub commune: String,
    pub form_type: FormType,
    #[serde(default)]
    pub priority: Priority,
    pub note: Option<String>,
}

/// Editable fields of a report still in the hands of its creator.
///
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportChanges {
    pub commune: Option<String>,
    pub form_type: Option<FormType>,
    pub priority: Option<Priority>,
    pub note: Option<String>,
}

impl ReportChanges {
    /// Returns true if applying the changes to `report` would modify nothing.
    #[must_use]
    pub fn is_noop_for(&self, report: &Report) -> bool {
        self.commune.as_ref().is_none_or(|c| *c == report.commune)
            && self.form_type.is_none_or(|f| f == report.form_type)
            && self.priority.is_none_or(|p| p == report.priority)
            && self
                .note
                .as_ref()
                .is_none_or(|n| report.note.as_ref() == Some(n))
    }
}

/// Provenance a package stamps onto each member report at transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageProvenance {
    pub reference: String,
    pub origin: Origin,
    pub sandbox: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub transmitted_at: OffsetDateTime,
}

/// A transmission batch delivered to one DDFIP.
///
/// Packages are only ever written together with their member reports, so a
/// stored package is always transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub package_id: i64,
    pub reference: String,
    pub origin: Origin,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    pub ddfip_id: i64,
    pub sandbox: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub transmitted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub discarded_at: Option<OffsetDateTime>,
}

impl Package {
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        self.discarded_at.is_some()
    }
}

/// Formats a monthly sequential reference such as `2026-10-0042`.
#[must_use]
pub fn format_reference(at: OffsetDateTime, sequence: u32) -> String {
    format!("{:04}-{:02}-{sequence:04}", at.year(), u8::from(at.month()))
}
