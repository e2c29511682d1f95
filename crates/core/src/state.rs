// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use signalements_audit::AuditEvent;
use signalements_domain::Report;

/// The result of an applied command.
///
/// Persisting a transition means writing `new_report` and `audit_event`
/// together, or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The report as it was before the command.
    pub previous: Report,
    /// The report after the command, with `lock_version` bumped.
    pub new_report: Report,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Outcome of applying a command to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(TransitionResult),
    /// The report already reflects the command. Nothing is written or audited.
    Unchanged,
}

impl TransitionOutcome {
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// The result of creating a report.
///
/// `report.report_id` and the event's `report_id` are assigned when stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    pub report: Report,
    pub audit_event: AuditEvent,
}
