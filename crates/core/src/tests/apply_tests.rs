// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use signalements_domain::{
    DomainError, FormType, Office, Priority, Report, ReportChanges, ReportEvent, ReportState,
    Resolution, RoutingMismatch,
};

use crate::{Command, CoreError, TransitionOutcome, apply};

use super::helpers::{
    DDFIP_64, NOW, apply_ok, create_assigned_report, create_draft_report, create_test_actor,
    create_test_cause, create_test_office, create_test_provenance, create_test_territory,
};

fn apply_err(report: &Report, command: Command) -> CoreError {
    apply(
        &create_test_territory(),
        report,
        command,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap_err()
}

#[test]
fn test_full_workflow_to_approved() {
    let report: Report = create_assigned_report();
    assert_eq!(report.state, ReportState::Assigned);
    assert_eq!(report.office_id, Some(5));
    assert_eq!(report.ddfip_id, Some(DDFIP_64));
    assert_eq!(report.package_reference.as_deref(), Some("2026-02-0001"));

    let report: Report = apply_ok(
        &report,
        Command::Resolve {
            resolution: Resolution::Applicable,
            motif: Some(String::from("maj_local")),
            reponse: None,
        },
    );
    assert_eq!(report.state, ReportState::Applicable);
    assert_eq!(report.resolved_at, Some(NOW));

    let report: Report = apply_ok(
        &report,
        Command::Confirm {
            reponse: Some(String::from("Base mise a jour")),
        },
    );
    assert_eq!(report.state, ReportState::Approved);
    assert_eq!(report.approved_at, Some(NOW));
    assert_eq!(report.canceled_at, None);
    assert_eq!(report.reponse.as_deref(), Some("Base mise a jour"));
}

#[test]
fn test_confirm_after_inapplicable_cancels() {
    let report: Report = apply_ok(
        &create_assigned_report(),
        Command::Resolve {
            resolution: Resolution::Inapplicable,
            motif: Some(String::from("doublon")),
            reponse: None,
        },
    );
    let report: Report = apply_ok(&report, Command::Confirm { reponse: None });

    assert_eq!(report.state, ReportState::Canceled);
    assert_eq!(report.canceled_at, Some(NOW));
}

#[test]
fn test_every_applied_command_bumps_lock_version_once() {
    let draft: Report = create_draft_report();
    let ready: Report = apply_ok(&draft, Command::MarkReady);
    assert_eq!(ready.lock_version, draft.lock_version + 1);

    let transmitted: Report = apply_ok(
        &ready,
        Command::Transmit {
            provenance: create_test_provenance(false),
        },
    );
    assert_eq!(transmitted.lock_version, ready.lock_version + 1);
}

#[test]
fn test_applied_command_produces_one_audit_event() {
    let report: Report = create_draft_report();
    let outcome: TransitionOutcome = apply(
        &create_test_territory(),
        &report,
        Command::MarkReady,
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let TransitionOutcome::Applied(result) = outcome else {
        panic!("expected an applied transition");
    };
    assert_eq!(result.previous, report);
    assert_eq!(result.audit_event.report_id, Some(report.report_id));
    assert_eq!(result.audit_event.action.name, "MarkReady");
    assert_eq!(result.audit_event.before.state, Some(ReportState::Draft));
    assert_eq!(result.audit_event.after.state, Some(ReportState::Ready));
    assert_eq!(result.audit_event.after.lock_version, 1);
}

#[test]
fn test_draft_cannot_be_assigned() {
    let err: CoreError = apply_err(
        &create_draft_report(),
        Command::Assign {
            office: create_test_office(),
        },
    );
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::InvalidTransition {
            from: ReportState::Draft,
            event: ReportEvent::Assign,
        })
    );
}

#[test]
fn test_draft_cannot_be_transmitted() {
    let err: CoreError = apply_err(
        &create_draft_report(),
        Command::Transmit {
            provenance: create_test_provenance(false),
        },
    );
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

#[test]
fn test_transmit_rejects_sandbox_mismatch() {
    let ready: Report = apply_ok(&create_draft_report(), Command::MarkReady);
    let err: CoreError = apply_err(
        &ready,
        Command::Transmit {
            provenance: create_test_provenance(true),
        },
    );
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::SandboxMismatch {
            report_sandbox: false,
            package_sandbox: true,
        })
    );
}

#[test]
fn test_assign_rejects_office_without_competence() {
    let accepted: Report = {
        let ready: Report = apply_ok(&create_draft_report(), Command::MarkReady);
        let transmitted: Report = apply_ok(
            &ready,
            Command::Transmit {
                provenance: create_test_provenance(false),
            },
        );
        apply_ok(&transmitted, Command::Accept)
    };
    let mut office: Office = create_test_office();
    office.competences.clear();
    office.competences.insert(FormType::CreationProfessional);

    let err: CoreError = apply_err(&accepted, Command::Assign { office });
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::RoutingMismatch {
            office_id: 5,
            reason: RoutingMismatch::MissingCompetence {
                form_type: FormType::ValuationHabitation,
            },
        })
    );
}

#[test]
fn test_reassign_to_another_office() {
    let assigned: Report = create_assigned_report();
    let mut other: Office = create_test_office();
    other.office_id = 6;

    let reassigned: Report = apply_ok(&assigned, Command::Assign { office: other });
    assert_eq!(reassigned.state, ReportState::Assigned);
    assert_eq!(reassigned.office_id, Some(6));
}

#[test]
fn test_rejected_report_cannot_be_accepted() {
    let ready: Report = apply_ok(&create_draft_report(), Command::MarkReady);
    let transmitted: Report = apply_ok(
        &ready,
        Command::Transmit {
            provenance: create_test_provenance(false),
        },
    );
    let rejected: Report = apply_ok(
        &transmitted,
        Command::Reject {
            reason: Some(String::from("Hors perimetre")),
        },
    );
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Hors perimetre"));

    let err: CoreError = apply_err(&rejected, Command::Accept);
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::InvalidTransition {
            from: ReportState::Rejected,
            event: ReportEvent::Accept,
        })
    );
}

#[test]
fn test_assigned_report_cannot_be_rejected() {
    let err: CoreError = apply_err(&create_assigned_report(), Command::Reject { reason: None });
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidTransition { .. })
    ));
}

#[test]
fn test_update_changes_creator_fields() {
    let updated: Report = apply_ok(
        &create_draft_report(),
        Command::Update {
            changes: ReportChanges {
                commune: Some(String::from("64445")),
                priority: Some(Priority::High),
                ..ReportChanges::default()
            },
        },
    );
    assert_eq!(updated.commune, "64445");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.form_type, FormType::ValuationHabitation);
}

#[test]
fn test_update_rejects_unknown_commune() {
    let err: CoreError = apply_err(
        &create_draft_report(),
        Command::Update {
            changes: ReportChanges {
                commune: Some(String::from("00000")),
                ..ReportChanges::default()
            },
        },
    );
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::UnknownCommune(String::from("00000")))
    );
}

#[test]
fn test_transmitted_report_cannot_be_updated() {
    let err: CoreError = apply_err(
        &create_assigned_report(),
        Command::Update {
            changes: ReportChanges {
                priority: Some(Priority::Low),
                ..ReportChanges::default()
            },
        },
    );
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::NotEditable {
            state: ReportState::Assigned,
            ..
        })
    ));
}

#[test]
fn test_discarded_report_only_accepts_undiscard() {
    let discarded: Report = apply_ok(&create_draft_report(), Command::Discard);
    assert!(discarded.is_discarded());

    assert_eq!(
        apply_err(&discarded, Command::MarkReady),
        CoreError::DomainViolation(DomainError::ReportDiscarded(1))
    );

    let restored: Report = apply_ok(&discarded, Command::Undiscard);
    assert!(!restored.is_discarded());
    assert_eq!(restored.state, ReportState::Draft);
}
