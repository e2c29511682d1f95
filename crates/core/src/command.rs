// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use signalements_domain::{Office, PackageProvenance, ReportChanges, ReportEvent, Resolution};

/// A command represents user intent on an existing report, as data only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit the creator-owned fields.
    Update { changes: ReportChanges },
    MarkReady,
    /// Stamp the provenance of the enclosing package.
    Transmit { provenance: PackageProvenance },
    Accept,
    /// Route to an office. The office is validated against the report.
    Assign { office: Office },
    Resolve {
        resolution: Resolution,
        motif: Option<String>,
        reponse: Option<String>,
    },
    Confirm { reponse: Option<String> },
    Reject { reason: Option<String> },
    Discard,
    Undiscard,
}

impl Command {
    /// Returns the action name recorded in the audit trail.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "Update",
            Self::MarkReady => "MarkReady",
            Self::Transmit { .. } => "Transmit",
            Self::Accept => "Accept",
            Self::Assign { .. } => "Assign",
            Self::Resolve { .. } => "Resolve",
            Self::Confirm { .. } => "Confirm",
            Self::Reject { .. } => "Reject",
            Self::Discard => "Discard",
            Self::Undiscard => "Undiscard",
        }
    }

    /// Returns the lifecycle event this command drives, if any.
    ///
    /// Editing and discarding do not move the report along its workflow.
    #[must_use]
    pub const fn event(&self) -> Option<ReportEvent> {
        match self {
            Self::MarkReady => Some(ReportEvent::MarkReady),
            Self::Transmit { .. } => Some(ReportEvent::Transmit),
            Self::Accept => Some(ReportEvent::Accept),
            Self::Assign { .. } => Some(ReportEvent::Assign),
            Self::Resolve { resolution, .. } => Some(ReportEvent::Resolve(*resolution)),
            Self::Confirm { .. } => Some(ReportEvent::Confirm),
            Self::Reject { .. } => Some(ReportEvent::Reject),
            Self::Update { .. } | Self::Discard | Self::Undiscard => None,
        }
    }
}
