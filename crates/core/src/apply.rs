// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{CreationResult, TransitionOutcome, TransitionResult};
use signalements_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use signalements_domain::{
    DomainError, NewReport, Origin, Report, ReportEvent, ReportState, Territory,
    check_office_eligibility,
};
use time::OffsetDateTime;

/// Builds a draft report from creator input.
///
/// The returned report has `report_id == 0` until persistence assigns one.
///
/// # Arguments
///
/// * `territory` - Commune index used to check the report can be routed
/// * `new_report` - The creator-supplied fields
/// * `reference` - The human reference allocated for the report
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - Creation time
///
/// # Errors
///
/// Returns an error if:
/// - The reference is empty
/// - The origin and publisher disagree (API reports need a publisher, web reports must not have one)
/// - A sandbox report is not created by a publisher
/// - The commune is unknown or has no DDFIP
pub fn apply_create(
    territory: &Territory,
    new_report: NewReport,
    reference: String,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreationResult, CoreError> {
    if reference.trim().is_empty() {
        return Err(DomainError::InvalidReference(reference).into());
    }
    match (new_report.origin, new_report.publisher_id) {
        (Origin::Api, None) => {
            return Err(DomainError::InvalidOrigin(String::from(
                "api reports must name their publisher",
            ))
            .into());
        }
        (Origin::WebUi, Some(_)) => {
            return Err(DomainError::InvalidOrigin(String::from(
                "web_ui reports cannot name a publisher",
            ))
            .into());
        }
        _ => {}
    }
    if new_report.sandbox && new_report.publisher_id.is_none() {
        return Err(DomainError::SandboxRequiresPublisher.into());
    }
    territory.ddfip_for_commune(&new_report.commune)?;

    let report: Report = Report {
        report_id: 0,
        reference,
        origin: new_report.origin,
        collectivity_id: new_report.collectivity_id,
        publisher_id: new_report.publisher_id,
        sandbox: new_report.sandbox,
        commune: new_report.commune,
        form_type: new_report.form_type,
        priority: new_report.priority,
        note: new_report.note,
        state: ReportState::Draft,
        ddfip_id: None,
        office_id: None,
        package_reference: None,
        resolution_motif: None,
        reponse: None,
        rejection_reason: None,
        created_at: now,
        ready_at: None,
        transmitted_at: None,
        accepted_at: None,
        assigned_at: None,
        resolved_at: None,
        approved_at: None,
        canceled_at: None,
        rejected_at: None,
        discarded_at: None,
        lock_version: 0,
    };

    let action: Action = Action::new(
        String::from("Create"),
        Some(format!(
            "Created {} report {}",
            report.form_type, report.reference
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::absent(),
        StateSnapshot::of(&report),
        now,
    );

    Ok(CreationResult {
        report,
        audit_event,
    })
}

/// Applies a command to a report, producing the new report and its audit event.
///
/// Permission checks happen before this call; `apply` only enforces the
/// lifecycle and the data invariants. A command that would leave the report
/// exactly as it is yields [`TransitionOutcome::Unchanged`].
///
/// # Arguments
///
/// * `territory` - Commune index used for DDFIP derivation and routing
/// * `report` - The current report (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - Time stamped onto the transition
///
/// # Errors
///
/// Returns an error if:
/// - The report is discarded and the command is neither `Discard` nor `Undiscard`
/// - The lifecycle does not allow the event from the current state
/// - An edit targets a report that has left its creator
/// - The package sandbox flag differs from the report's
/// - The target office cannot handle the report
#[allow(clippy::too_many_lines)]
pub fn apply(
    territory: &Territory,
    report: &Report,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionOutcome, CoreError> {
    if report.is_discarded() && !matches!(command, Command::Discard | Command::Undiscard) {
        return Err(DomainError::ReportDiscarded(report.report_id).into());
    }

    let name: &'static str = command.name();
    let mut next: Report = report.clone();
    let mut details: Option<String> = None;

    match command {
        Command::Update { changes } => {
            if !report.state.is_editable() {
                return Err(DomainError::NotEditable {
                    report_id: report.report_id,
                    state: report.state,
                }
                .into());
            }
            if changes.is_noop_for(report) {
                return Ok(TransitionOutcome::Unchanged);
            }
            if let Some(commune) = changes.commune {
                territory.ddfip_for_commune(&commune)?;
                next.commune = commune;
            }
            if let Some(form_type) = changes.form_type {
                next.form_type = form_type;
            }
            if let Some(priority) = changes.priority {
                next.priority = priority;
            }
            if let Some(note) = changes.note {
                next.note = Some(note);
            }
        }
        Command::MarkReady => {
            let target: ReportState = ReportEvent::MarkReady.target(report.state)?;
            if target == report.state {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            next.ready_at = Some(now);
        }
        Command::Transmit { provenance } => {
            let target: ReportState = ReportEvent::Transmit.target(report.state)?;
            if provenance.sandbox != report.sandbox {
                return Err(DomainError::SandboxMismatch {
                    report_sandbox: report.sandbox,
                    package_sandbox: provenance.sandbox,
                }
                .into());
            }
            if provenance.reference.trim().is_empty() {
                return Err(DomainError::InvalidReference(provenance.reference).into());
            }
            next.ddfip_id = Some(territory.ddfip_for_commune(&report.commune)?);
            next.state = target;
            next.transmitted_at = Some(provenance.transmitted_at);
            details = Some(format!("Package {}", provenance.reference));
            next.package_reference = Some(provenance.reference);
        }
        Command::Accept => {
            let target: ReportState = ReportEvent::Accept.target(report.state)?;
            if target == report.state {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            next.accepted_at = Some(now);
        }
        Command::Assign { office } => {
            let target: ReportState = ReportEvent::Assign.target(report.state)?;
            check_office_eligibility(report, &office, territory)?;
            if target == report.state && report.office_id == Some(office.office_id) {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            next.office_id = Some(office.office_id);
            next.assigned_at = Some(now);
            details = Some(format!("Office {} ({})", office.office_id, office.name));
        }
        Command::Resolve {
            resolution,
            motif,
            reponse,
        } => {
            let target: ReportState = ReportEvent::Resolve(resolution).target(report.state)?;
            if target == report.state
                && report.resolution_motif == motif
                && report.reponse == reponse
            {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            next.resolution_motif = motif;
            next.reponse = reponse;
            next.resolved_at = Some(now);
        }
        Command::Confirm { reponse } => {
            let target: ReportState = ReportEvent::Confirm.target(report.state)?;
            if target == report.state
                && reponse
                    .as_ref()
                    .is_none_or(|r| report.reponse.as_ref() == Some(r))
            {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            if reponse.is_some() {
                next.reponse = reponse;
            }
            if target == ReportState::Approved {
                next.approved_at = Some(now);
            } else {
                next.canceled_at = Some(now);
            }
        }
        Command::Reject { reason } => {
            let target: ReportState = ReportEvent::Reject.target(report.state)?;
            if target == report.state
                && reason
                    .as_ref()
                    .is_none_or(|r| report.rejection_reason.as_ref() == Some(r))
            {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.state = target;
            next.rejected_at = Some(now);
            details.clone_from(&reason);
            if reason.is_some() {
                next.rejection_reason = reason;
            }
        }
        Command::Discard => {
            if report.is_discarded() {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.discarded_at = Some(now);
        }
        Command::Undiscard => {
            if !report.is_discarded() {
                return Ok(TransitionOutcome::Unchanged);
            }
            next.discarded_at = None;
        }
    }

    next.lock_version += 1;

    let audit_event: AuditEvent = AuditEvent::new(
        Some(report.report_id),
        actor,
        cause,
        Action::new(name.to_string(), details),
        StateSnapshot::of(report),
        StateSnapshot::of(&next),
        now,
    );

    Ok(TransitionOutcome::Applied(TransitionResult {
        previous: report.clone(),
        new_report: next,
        audit_event,
    }))
}
