// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::report_state::{ReportEvent, ReportState};
use crate::routing::RoutingMismatch;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A report state string could not be parsed.
    InvalidReportState(String),
    /// A form type string could not be parsed.
    InvalidFormType(String),
    /// An origin string could not be parsed.
    InvalidOrigin(String),
    /// A priority string could not be parsed.
    InvalidPriority(String),
    /// A resolution string could not be parsed.
    InvalidResolution(String),
    /// An organization kind string could not be parsed.
    InvalidOrganizationKind(String),
    /// A collectivity territory kind string could not be parsed.
    InvalidTerritoryKind(String),
    /// The requested event is not permitted from the current state.
    InvalidTransition {
        /// The state the report is in.
        from: ReportState,
        /// The event that was requested.
        event: ReportEvent,
    },
    /// The target office cannot handle the report.
    RoutingMismatch {
        /// The office that was targeted.
        office_id: i64,
        /// Why the office does not match.
        reason: RoutingMismatch,
    },
    /// The commune is not part of the territory index.
    UnknownCommune(String),
    /// No DDFIP is registered for the departement.
    DdfipNotFound {
        /// The departement code.
        code_departement: String,
    },
    /// The collectivity does not exist or is not transmitted by the publisher.
    CollectivityNotManaged {
        /// The collectivity identifier.
        collectivity_id: i64,
        /// The publisher identifier.
        publisher_id: i64,
    },
    /// Package provenance does not match the report.
    SandboxMismatch {
        /// The report's sandbox flag.
        report_sandbox: bool,
        /// The package's sandbox flag.
        package_sandbox: bool,
    },
    /// The report has left its creator and can no longer be edited.
    NotEditable {
        /// The report identifier.
        report_id: i64,
        /// The state the report is in.
        state: ReportState,
    },
    /// Only publishers may create sandbox reports.
    SandboxRequiresPublisher,
    /// The report has been discarded.
    ReportDiscarded(i64),
    /// The report is not discarded.
    ReportNotDiscarded(i64),
    /// A reference string is empty or malformed.
    InvalidReference(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReportState(s) => write!(f, "Invalid report state: {s}"),
            Self::InvalidFormType(s) => write!(f, "Invalid form type: {s}"),
            Self::InvalidOrigin(s) => write!(f, "Invalid origin: {s}"),
            Self::InvalidPriority(s) => write!(f, "Invalid priority: {s}"),
            Self::InvalidResolution(s) => write!(f, "Invalid resolution: {s}"),
            Self::InvalidOrganizationKind(s) => write!(f, "Invalid organization kind: {s}"),
            Self::InvalidTerritoryKind(s) => write!(f, "Invalid territory kind: {s}"),
            Self::InvalidTransition { from, event } => {
                write!(
                    f,
                    "Cannot {} a report in state '{}'",
                    event.as_str(),
                    from.as_str()
                )
            }
            Self::RoutingMismatch { office_id, reason } => {
                write!(f, "Office {office_id} cannot handle this report: {reason}")
            }
            Self::UnknownCommune(code) => write!(f, "Unknown commune '{code}'"),
            Self::DdfipNotFound { code_departement } => {
                write!(f, "No DDFIP registered for departement '{code_departement}'")
            }
            Self::CollectivityNotManaged {
                collectivity_id,
                publisher_id,
            } => {
                write!(
                    f,
                    "Collectivity {collectivity_id} is not managed by publisher {publisher_id}"
                )
            }
            Self::SandboxMismatch {
                report_sandbox,
                package_sandbox,
            } => {
                write!(
                    f,
                    "Report sandbox flag ({report_sandbox}) differs from package sandbox flag ({package_sandbox})"
                )
            }
            Self::NotEditable { report_id, state } => {
                write!(f, "Report {report_id} is '{state}' and can no longer be edited")
            }
            Self::SandboxRequiresPublisher => {
                write!(f, "Sandbox reports can only be created by a publisher")
            }
            Self::ReportDiscarded(id) => write!(f, "Report {id} has been discarded"),
            Self::ReportNotDiscarded(id) => write!(f, "Report {id} is not discarded"),
            Self::InvalidReference(s) => write!(f, "Invalid reference: {s}"),
        }
    }
}

impl std::error::Error for DomainError {}
