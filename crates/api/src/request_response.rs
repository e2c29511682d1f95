// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Enumerated fields travel as strings and are parsed in the handlers, so an
//! unknown value becomes `ApiError::InvalidInput` naming the field.

use serde::{Deserialize, Serialize};
use signalements_domain::{Package, Report};

/// API request to create a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReportRequest {
    /// INSEE code of the commune.
    pub commune: String,
    pub form_type: String,
    pub priority: Option<String>,
    pub note: Option<String>,
    /// Required for publishers, who report on behalf of a collectivity.
    pub collectivity_id: Option<i64>,
    #[serde(default)]
    pub sandbox: bool,
}

/// API request to edit a draft or ready report. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub commune: Option<String>,
    pub form_type: Option<String>,
    pub priority: Option<String>,
    pub note: Option<String>,
}

/// A workflow step requested on a report.
///
/// Transmission is not a single-report request; see [`TransmitReportsRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransitionRequest {
    MarkReady,
    Accept,
    Assign {
        office_id: i64,
    },
    Resolve {
        resolution: String,
        motif: Option<String>,
        reponse: Option<String>,
    },
    Confirm {
        reponse: Option<String>,
    },
    Reject {
        reason: Option<String>,
    },
    Discard,
    Undiscard,
}

/// API request to transmit ready reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmitReportsRequest {
    pub report_ids: Vec<i64>,
}

/// API response for a transmission: one package per DDFIP and sandbox flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmitReportsResponse {
    pub packages: Vec<Package>,
    pub reports: Vec<Report>,
}

/// API request to apply the same step to many reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransitionRequest {
    pub report_ids: Vec<i64>,
    pub transition: TransitionRequest,
}

/// Outcome of one report within a bulk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkItemStatus {
    Succeeded,
    /// The report already was where the step would take it.
    Skipped,
    /// The policy refused the step.
    Denied,
    /// The step was allowed but failed, e.g. on a conflict.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    pub report_id: i64,
    pub status: BulkItemStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransitionResponse {
    pub outcomes: Vec<BulkItemOutcome>,
}

/// API request to change an office. Absent sets are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOfficeRequest {
    pub competences: Option<Vec<String>>,
    pub member_ids: Option<Vec<i64>>,
}

/// Advisory flag for UI gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Allowed,
    Denied,
}

impl Capability {
    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }

    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// What an actor may do with reports in general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    pub can_create_report: Capability,
    pub can_transmit: Capability,
    pub can_list_packages: Capability,
    pub can_manage_offices: Capability,
}

/// What an actor may do with one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCapabilities {
    pub can_view: Capability,
    pub can_update: Capability,
    pub can_discard: Capability,
    pub can_undiscard: Capability,
    pub can_mark_ready: Capability,
    pub can_transmit: Capability,
    pub can_accept: Capability,
    pub can_assign: Capability,
    pub can_resolve: Capability,
    pub can_confirm: Capability,
    pub can_reject: Capability,
}
