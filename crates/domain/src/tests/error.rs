// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, FormType, ReportEvent, ReportState, RoutingMismatch};

#[test]
fn test_invalid_transition_display() {
    let err = DomainError::InvalidTransition {
        from: ReportState::Draft,
        event: ReportEvent::Assign,
    };
    assert_eq!(err.to_string(), "Cannot assign a report in state 'draft'");
}

#[test]
fn test_routing_mismatch_display_names_the_reason() {
    let err = DomainError::RoutingMismatch {
        office_id: 7,
        reason: RoutingMismatch::MissingCompetence {
            form_type: FormType::OccupancyProfessional,
        },
    };
    assert_eq!(
        err.to_string(),
        "Office 7 cannot handle this report: office is not competent for 'occupancy_professional'"
    );
}

#[test]
fn test_ddfip_not_found_display() {
    let err = DomainError::DdfipNotFound {
        code_departement: String::from("2A"),
    };
    assert!(err.to_string().contains("'2A'"));
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&DomainError::UnknownCommune(String::from("00000")));
}
