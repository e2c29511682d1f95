// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use signalements_domain::{DomainError, NewReport, Origin, ReportState};

use crate::{CoreError, CreationResult, apply_create};

use super::helpers::{
    NOW, create_test_actor, create_test_cause, create_test_new_report, create_test_territory,
};

fn create(new_report: NewReport) -> Result<CreationResult, CoreError> {
    apply_create(
        &create_test_territory(),
        new_report,
        String::from("2026-02-0001"),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
}

#[test]
fn test_create_produces_draft_and_audit_event() {
    let result: CreationResult = create(create_test_new_report()).unwrap();

    assert_eq!(result.report.state, ReportState::Draft);
    assert_eq!(result.report.lock_version, 0);
    assert_eq!(result.report.created_at, NOW);
    assert_eq!(result.report.ddfip_id, None);
    assert_eq!(result.audit_event.action.name, "Create");
    assert_eq!(result.audit_event.before.state, None);
    assert_eq!(result.audit_event.after.state, Some(ReportState::Draft));
    assert_eq!(result.audit_event.report_id, None);
}

#[test]
fn test_create_rejects_unknown_commune() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.commune = String::from("99999");

    assert_eq!(
        create(new_report).unwrap_err(),
        CoreError::DomainViolation(DomainError::UnknownCommune(String::from("99999")))
    );
}

#[test]
fn test_create_rejects_commune_without_ddfip() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.commune = String::from("2A004");

    assert!(matches!(
        create(new_report),
        Err(CoreError::DomainViolation(DomainError::DdfipNotFound { .. }))
    ));
}

#[test]
fn test_api_report_requires_publisher() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.origin = Origin::Api;

    assert!(matches!(
        create(new_report),
        Err(CoreError::DomainViolation(DomainError::InvalidOrigin(_)))
    ));
}

#[test]
fn test_web_report_cannot_name_publisher() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.publisher_id = Some(3);

    assert!(matches!(
        create(new_report),
        Err(CoreError::DomainViolation(DomainError::InvalidOrigin(_)))
    ));
}

#[test]
fn test_sandbox_requires_publisher() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.sandbox = true;

    assert_eq!(
        create(new_report).unwrap_err(),
        CoreError::DomainViolation(DomainError::SandboxRequiresPublisher)
    );
}

#[test]
fn test_publisher_may_create_sandbox_report() {
    let mut new_report: NewReport = create_test_new_report();
    new_report.origin = Origin::Api;
    new_report.publisher_id = Some(3);
    new_report.sandbox = true;

    let result: CreationResult = create(new_report).unwrap();
    assert!(result.report.sandbox);
    assert_eq!(result.report.publisher_id, Some(3));
}

#[test]
fn test_create_rejects_blank_reference() {
    let result = apply_create(
        &create_test_territory(),
        create_test_new_report(),
        String::from("  "),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidReference(_)))
    ));
}
