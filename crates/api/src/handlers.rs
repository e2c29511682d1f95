// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every state-changing handler follows the same sequence: load the current
//! report, authorize, compare versions, apply the command in the core, then
//! persist the new report and its audit event in one transaction.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use signalements::{
    Command, CreationResult, TransitionOutcome, TransitionResult, apply, apply_create,
};
use signalements_audit::{AuditEvent, Cause};
use signalements_domain::{
    DomainError, FormType, NewReport, Office, Organization, Origin, Package, PackageProvenance,
    Priority, Report, ReportChanges, Resolution, Territory, User,
};
use signalements_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::AuthenticatedActor;
use crate::capabilities::compute_report_capabilities;
use crate::error::{
    ApiError, translate_core_error, translate_denial, translate_domain_error,
    translate_persistence_error,
};
use crate::policy::{Action, Decision, DenialReason, authorize, authorize_manage_office};
use crate::request_response::{
    BulkItemOutcome, BulkItemStatus, BulkTransitionResponse, CreateReportRequest,
    ReportCapabilities, TransitionRequest, TransmitReportsResponse, UpdateOfficeRequest,
    UpdateReportRequest,
};
use crate::scope::{package_scope, report_scope};

fn require(
    actor: &AuthenticatedActor,
    action: Action,
    report: Option<&Report>,
) -> Result<(), ApiError> {
    authorize(actor, action, report)
        .into_result()
        .map_err(|reason| translate_denial(action, &reason))
}

fn parse_field<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(translate_domain_error)
}

fn load_report(persistence: &mut Persistence, report_id: i64) -> Result<Report, ApiError> {
    persistence
        .get_report(report_id)
        .map_err(translate_persistence_error)
}

fn load_territory(persistence: &mut Persistence) -> Result<Territory, ApiError> {
    persistence
        .load_territory()
        .map_err(translate_persistence_error)
}

/// Checks that `publisher_id` transmits for `collectivity_id`.
///
/// An unknown collectivity is reported the same way as one managed by
/// another publisher.
fn check_managed(
    persistence: &mut Persistence,
    collectivity_id: i64,
    publisher_id: i64,
) -> Result<(), ApiError> {
    let not_managed = || {
        translate_domain_error(DomainError::CollectivityNotManaged {
            collectivity_id,
            publisher_id,
        })
    };
    match persistence.get_organization(collectivity_id) {
        Ok(Organization::Collectivity(collectivity))
            if collectivity.publisher_id == Some(publisher_id) =>
        {
            Ok(())
        }
        Ok(_) | Err(PersistenceError::OrganizationNotFound(_)) => Err(not_managed()),
        Err(e) => Err(translate_persistence_error(e)),
    }
}

/// Creates a draft report for the actor's collectivity.
///
/// Collectivity users report for their own collectivity through the web UI.
/// Publishers report through the API for a collectivity they transmit for,
/// and only they may create sandbox reports.
///
/// # Errors
///
/// Returns an error if:
/// - The actor cannot create reports
/// - A publisher names no collectivity, or one it does not manage
/// - The form type or priority is unknown
/// - The commune is unknown or has no DDFIP
/// - A collectivity user asks for a sandbox report
pub fn create_report(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateReportRequest,
    cause: Cause,
) -> Result<Report, ApiError> {
    require(actor, Action::Create, None)?;

    let (origin, collectivity_id, publisher_id): (Origin, i64, Option<i64>) =
        match &actor.organization {
            Organization::Collectivity(collectivity) => {
                if request
                    .collectivity_id
                    .is_some_and(|id| id != collectivity.collectivity_id)
                {
                    return Err(ApiError::Unauthorized {
                        action: String::from("create"),
                        reason: String::from(
                            "collectivity users may only report for their own collectivity",
                        ),
                    });
                }
                (Origin::WebUi, collectivity.collectivity_id, None)
            }
            Organization::Publisher(publisher) => {
                let collectivity_id: i64 =
                    request
                        .collectivity_id
                        .ok_or_else(|| ApiError::InvalidInput {
                            field: String::from("collectivity_id"),
                            message: String::from(
                                "publishers must name the collectivity they report for",
                            ),
                        })?;
                check_managed(persistence, collectivity_id, publisher.publisher_id)?;
                (Origin::Api, collectivity_id, Some(publisher.publisher_id))
            }
            Organization::Ddfip(_) | Organization::Dgfip(_) => {
                return Err(ApiError::Unauthorized {
                    action: String::from("create"),
                    reason: String::from("only collectivities and publishers create reports"),
                });
            }
        };

    let new_report: NewReport = NewReport {
        origin,
        collectivity_id,
        publisher_id,
        sandbox: request.sandbox,
        commune: request.commune.clone(),
        form_type: parse_field::<FormType>(&request.form_type)?,
        priority: request
            .priority
            .as_deref()
            .map(parse_field::<Priority>)
            .transpose()?
            .unwrap_or_default(),
        note: request.note.clone(),
    };

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let territory: Territory = load_territory(persistence)?;
    let reference: String = persistence
        .next_report_reference(now)
        .map_err(translate_persistence_error)?;
    let result: CreationResult = apply_create(
        &territory,
        new_report,
        reference,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    let report: Report = persistence
        .create_report(&result)
        .map_err(translate_persistence_error)?;
    info!(
        report_id = report.report_id,
        reference = %report.reference,
        user_id = actor.user.user_id,
        sandbox = report.sandbox,
        "Report created"
    );
    Ok(report)
}

/// Runs one authorized command against the stored version of `snapshot`.
///
/// Returns the stored report and whether anything was written.
fn execute<F>(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    snapshot: &Report,
    action: Action,
    cause: Cause,
    build_command: F,
) -> Result<(Report, bool), ApiError>
where
    F: FnOnce(&mut Persistence) -> Result<Command, ApiError>,
{
    let current: Report = load_report(persistence, snapshot.report_id)?;
    require(actor, action, Some(&current))?;

    if current.lock_version != snapshot.lock_version {
        return Err(ApiError::Conflict {
            message: format!(
                "Report {} is at version {}, the request was based on version {}",
                current.report_id, current.lock_version, snapshot.lock_version
            ),
        });
    }

    let command: Command = build_command(persistence)?;
    let territory: Territory = load_territory(persistence)?;
    let outcome: TransitionOutcome = apply(
        &territory,
        &current,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    match outcome {
        TransitionOutcome::Unchanged => {
            debug!(
                report_id = current.report_id,
                action = action.as_str(),
                "Report unchanged"
            );
            Ok((current, false))
        }
        TransitionOutcome::Applied(result) => {
            let event_id: i64 = persistence
                .persist_transition(&result)
                .map_err(translate_persistence_error)?;
            let report: Report = load_report(persistence, current.report_id)?;
            info!(
                report_id = report.report_id,
                event_id,
                action = action.as_str(),
                from = %current.state,
                to = %report.state,
                user_id = actor.user.user_id,
                "Report transitioned"
            );
            Ok((report, true))
        }
    }
}

const fn transition_action(request: &TransitionRequest) -> Action {
    match request {
        TransitionRequest::MarkReady => Action::MarkReady,
        TransitionRequest::Accept => Action::Accept,
        TransitionRequest::Assign { .. } => Action::Assign,
        TransitionRequest::Resolve { .. } => Action::Resolve,
        TransitionRequest::Confirm { .. } => Action::Confirm,
        TransitionRequest::Reject { .. } => Action::Reject,
        TransitionRequest::Discard => Action::Destroy,
        TransitionRequest::Undiscard => Action::Undiscard,
    }
}

fn transition_command(
    persistence: &mut Persistence,
    request: &TransitionRequest,
) -> Result<Command, ApiError> {
    Ok(match request {
        TransitionRequest::MarkReady => Command::MarkReady,
        TransitionRequest::Accept => Command::Accept,
        TransitionRequest::Assign { office_id } => Command::Assign {
            office: persistence
                .get_office(*office_id)
                .map_err(translate_persistence_error)?,
        },
        TransitionRequest::Resolve {
            resolution,
            motif,
            reponse,
        } => Command::Resolve {
            resolution: parse_field::<Resolution>(resolution)?,
            motif: motif.clone(),
            reponse: reponse.clone(),
        },
        TransitionRequest::Confirm { reponse } => Command::Confirm {
            reponse: reponse.clone(),
        },
        TransitionRequest::Reject { reason } => Command::Reject {
            reason: reason.clone(),
        },
        TransitionRequest::Discard => Command::Discard,
        TransitionRequest::Undiscard => Command::Undiscard,
    })
}

fn run_transition(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report: &Report,
    request: &TransitionRequest,
    cause: Cause,
) -> Result<(Report, bool), ApiError> {
    execute(
        persistence,
        actor,
        report,
        transition_action(request),
        cause,
        |persistence| transition_command(persistence, request),
    )
}

/// Applies a workflow step to a report.
///
/// `report` is the snapshot the caller acted on. If the stored report has
/// moved on since, the step is refused with `ApiError::Conflict`. A step that
/// would change nothing returns the stored report without writing.
///
/// # Errors
///
/// Returns an error if:
/// - The report does not exist
/// - The actor cannot see the report or lacks the role for the step
/// - The lifecycle does not allow the step from the current state
/// - The target office cannot handle the report
/// - The report changed since `report` was read
pub fn transition(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report: &Report,
    request: &TransitionRequest,
    cause: Cause,
) -> Result<Report, ApiError> {
    run_transition(persistence, actor, report, request, cause).map(|(report, _)| report)
}

/// Edits a draft or ready report.
///
/// # Errors
///
/// Returns an error if the actor is not the report's creator, the report is
/// no longer editable, a value is invalid, or the report changed since
/// `report` was read.
pub fn update_report(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report: &Report,
    request: &UpdateReportRequest,
    cause: Cause,
) -> Result<Report, ApiError> {
    let changes: ReportChanges = ReportChanges {
        commune: request.commune.clone(),
        form_type: request
            .form_type
            .as_deref()
            .map(parse_field::<FormType>)
            .transpose()?,
        priority: request
            .priority
            .as_deref()
            .map(parse_field::<Priority>)
            .transpose()?,
        note: request.note.clone(),
    };

    execute(persistence, actor, report, Action::Update, cause, |_| {
        Ok(Command::Update { changes })
    })
    .map(|(report, _)| report)
}

/// Transmits ready reports, one package per collectivity, DDFIP and sandbox
/// flag.
///
/// Every group is checked before anything is written, and all packages are
/// written in one transaction: a failure leaves every report untouched.
///
/// # Errors
///
/// Returns an error if the list is empty, a report does not exist, the actor
/// may not transmit one of the reports, or a write fails.
pub fn transmit_reports(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_ids: &[i64],
    cause: &Cause,
) -> Result<TransmitReportsResponse, ApiError> {
    require(actor, Action::Transmit, None)?;
    if report_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("report_ids"),
            message: String::from("At least one report is required"),
        });
    }

    let territory: Territory = load_territory(persistence)?;
    let ids: BTreeSet<i64> = report_ids.iter().copied().collect();
    let mut groups: BTreeMap<(i64, i64, bool), Vec<Report>> = BTreeMap::new();
    for report_id in ids {
        let report: Report = load_report(persistence, report_id)?;
        require(actor, Action::Transmit, Some(&report))?;
        let ddfip_id: i64 = report.ddfip(&territory).map_err(translate_domain_error)?;
        groups
            .entry((report.collectivity_id, ddfip_id, report.sandbox))
            .or_default()
            .push(report);
    }

    let (origin, publisher_id): (Origin, Option<i64>) = match &actor.organization {
        Organization::Publisher(publisher) => (Origin::Api, Some(publisher.publisher_id)),
        _ => (Origin::WebUi, None),
    };
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let references: Vec<String> = persistence
        .next_package_references(now, groups.len())
        .map_err(translate_persistence_error)?;

    let mut batch: Vec<(Package, Vec<TransitionResult>)> = Vec::with_capacity(groups.len());
    for (((collectivity_id, ddfip_id, sandbox), reports), reference) in
        groups.into_iter().zip(references)
    {
        let provenance: PackageProvenance = PackageProvenance {
            reference: reference.clone(),
            origin,
            sandbox,
            transmitted_at: now,
        };

        let mut transitions: Vec<TransitionResult> = Vec::with_capacity(reports.len());
        for report in &reports {
            let outcome: TransitionOutcome = apply(
                &territory,
                report,
                Command::Transmit {
                    provenance: provenance.clone(),
                },
                actor.to_audit_actor(),
                cause.clone(),
                now,
            )
            .map_err(translate_core_error)?;
            if let TransitionOutcome::Applied(result) = outcome {
                transitions.push(result);
            }
        }

        let package: Package = Package {
            package_id: 0,
            reference,
            origin,
            collectivity_id,
            publisher_id,
            ddfip_id,
            sandbox,
            transmitted_at: now,
            discarded_at: None,
        };
        batch.push((package, transitions));
    }

    let packages: Vec<Package> = persistence
        .persist_transmissions(&batch)
        .map_err(translate_persistence_error)?;

    let mut transmitted: Vec<Report> = Vec::new();
    for (stored, (_, transitions)) in packages.iter().zip(&batch) {
        info!(
            package_id = stored.package_id,
            reference = %stored.reference,
            ddfip_id = stored.ddfip_id,
            sandbox = stored.sandbox,
            reports = transitions.len(),
            "Package transmitted"
        );
        for result in transitions {
            transmitted.push(load_report(persistence, result.new_report.report_id)?);
        }
    }

    Ok(TransmitReportsResponse {
        packages,
        reports: transmitted,
    })
}

/// Applies the same step to many reports, one transaction each.
///
/// Failures do not stop the batch; every report gets its own outcome.
/// Lifecycle and policy refusals are `Denied`; conflicts, routing and lookup
/// failures are `Failed`.
pub fn bulk_transition(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_ids: &[i64],
    request: &TransitionRequest,
    cause: &Cause,
) -> BulkTransitionResponse {
    let mut outcomes: Vec<BulkItemOutcome> = Vec::with_capacity(report_ids.len());

    for &report_id in report_ids {
        let result: Result<(Report, bool), ApiError> = load_report(persistence, report_id)
            .and_then(|report| run_transition(persistence, actor, &report, request, cause.clone()));

        let (status, message): (BulkItemStatus, Option<String>) = match result {
            Ok((_, true)) => (BulkItemStatus::Succeeded, None),
            Ok((_, false)) => (BulkItemStatus::Skipped, None),
            Err(err @ (ApiError::Unauthorized { .. } | ApiError::InvalidTransition { .. })) => {
                (BulkItemStatus::Denied, Some(err.to_string()))
            }
            Err(err) => (BulkItemStatus::Failed, Some(err.to_string())),
        };
        if status == BulkItemStatus::Failed {
            warn!(report_id, error = ?message, "Bulk transition item failed");
        }
        outcomes.push(BulkItemOutcome {
            report_id,
            status,
            message,
        });
    }

    info!(
        items = outcomes.len(),
        succeeded = outcomes
            .iter()
            .filter(|o| o.status == BulkItemStatus::Succeeded)
            .count(),
        "Bulk transition processed"
    );
    BulkTransitionResponse { outcomes }
}

/// Loads a report the actor may see.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the report does not exist, or
/// `ApiError::Unauthorized` if the actor cannot see it.
pub fn get_report(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_id: i64,
) -> Result<Report, ApiError> {
    let report: Report = load_report(persistence, report_id)?;
    require(actor, Action::Show, Some(&report))?;
    Ok(report)
}

/// Lists the reports visible to the actor.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_reports(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<Report>, ApiError> {
    require(actor, Action::Index, None)?;
    let reports: Vec<Report> = persistence
        .list_reports(&report_scope(actor))
        .map_err(translate_persistence_error)?;
    debug!(
        user_id = actor.user.user_id,
        count = reports.len(),
        "Listed reports"
    );
    Ok(reports)
}

/// Lists the packages visible to the actor.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_packages(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<Package>, ApiError> {
    persistence
        .list_packages(&package_scope(actor))
        .map_err(translate_persistence_error)
}

/// Lists the offices a report may be assigned to.
///
/// Only actors who may assign the report get an answer; the report does not
/// need to be in an assignable state yet.
///
/// # Errors
///
/// Returns an error if the report does not exist, the actor may not assign
/// it, or its commune cannot be resolved.
pub fn route_candidates(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_id: i64,
) -> Result<Vec<Office>, ApiError> {
    let report: Report = load_report(persistence, report_id)?;
    match authorize(actor, Action::Assign, Some(&report)) {
        Decision::Allowed | Decision::Denied(DenialReason::IllegalState { .. }) => {}
        Decision::Denied(reason) => return Err(translate_denial(Action::Assign, &reason)),
    }

    let territory: Territory = load_territory(persistence)?;
    let ddfip_id: i64 = report.ddfip(&territory).map_err(translate_domain_error)?;
    let offices: Vec<Office> = persistence
        .list_offices_for_ddfip(ddfip_id)
        .map_err(translate_persistence_error)?;

    Ok(
        signalements_domain::route_candidates(&report, &offices, &territory)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// Computes what the actor may do with a report.
///
/// # Errors
///
/// Returns an error if the report does not exist, or the actor can neither
/// see it nor restore it.
pub fn report_capabilities(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_id: i64,
) -> Result<ReportCapabilities, ApiError> {
    let report: Report = load_report(persistence, report_id)?;
    let capabilities: ReportCapabilities = compute_report_capabilities(actor, &report);
    if !capabilities.can_view.is_allowed() && !capabilities.can_undiscard.is_allowed() {
        require(actor, Action::Show, Some(&report))?;
    }
    Ok(capabilities)
}

/// Lists the audit trail of a report the actor may see, oldest first.
///
/// # Errors
///
/// Returns an error if the report does not exist or the actor cannot see it.
pub fn report_audit_trail(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    report_id: i64,
) -> Result<Vec<AuditEvent>, ApiError> {
    let report: Report = load_report(persistence, report_id)?;
    require(actor, Action::Show, Some(&report))?;
    persistence
        .get_audit_trail(report_id)
        .map_err(translate_persistence_error)
}

/// Replaces the competences and/or members of an office.
///
/// New members must belong to the office's DDFIP.
///
/// # Errors
///
/// Returns an error if the office does not exist, the actor does not
/// administer its DDFIP, a form type is unknown, or a member is not a user
/// of the DDFIP.
pub fn update_office(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    office_id: i64,
    request: &UpdateOfficeRequest,
) -> Result<Office, ApiError> {
    let office: Office = persistence
        .get_office(office_id)
        .map_err(translate_persistence_error)?;
    authorize_manage_office(actor, &office)
        .into_result()
        .map_err(|reason| ApiError::Unauthorized {
            action: String::from("manage_office"),
            reason: reason.to_string(),
        })?;

    let competences: Option<BTreeSet<FormType>> = request
        .competences
        .as_ref()
        .map(|names| {
            names
                .iter()
                .map(|name| parse_field::<FormType>(name))
                .collect::<Result<BTreeSet<FormType>, ApiError>>()
        })
        .transpose()?;

    let member_ids: Option<BTreeSet<i64>> = match &request.member_ids {
        Some(ids) => {
            let ids: BTreeSet<i64> = ids.iter().copied().collect();
            for &user_id in &ids {
                let user: User = persistence.get_user(user_id).map_err(|e| match e {
                    PersistenceError::UserNotFound(_) => ApiError::InvalidInput {
                        field: String::from("member_ids"),
                        message: format!("User {user_id} does not exist"),
                    },
                    other => translate_persistence_error(other),
                })?;
                if user.organization_id != office.ddfip_id {
                    return Err(ApiError::InvalidInput {
                        field: String::from("member_ids"),
                        message: format!(
                            "User {user_id} does not belong to DDFIP {}",
                            office.ddfip_id
                        ),
                    });
                }
            }
            Some(ids)
        }
        None => None,
    };

    let updated: Office = persistence
        .update_office(office_id, competences.as_ref(), member_ids.as_ref())
        .map_err(translate_persistence_error)?;
    info!(
        office_id,
        user_id = actor.user.user_id,
        "Office updated"
    );
    Ok(updated)
}
