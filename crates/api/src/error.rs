// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use signalements::CoreError;
use signalements_domain::DomainError;
use signalements_persistence::PersistenceError;

use crate::policy::{Action, DenialReason};

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request does not name a known user.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform the action, or cannot see its target.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the policy denied it.
        reason: String,
    },
    /// The lifecycle does not allow the action from the current state.
    InvalidTransition {
        /// A human-readable description of the rejected transition.
        message: String,
    },
    /// The target office cannot handle the report.
    RoutingMismatch {
        /// The office that was targeted.
        office_id: i64,
        /// Why the office does not match.
        reason: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The report changed since the caller read it.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: cannot '{action}': {reason}")
            }
            Self::InvalidTransition { message } => write!(f, "Invalid transition: {message}"),
            Self::RoutingMismatch { office_id, reason } => {
                write!(f, "Office {office_id} cannot handle this report: {reason}")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a policy denial into an API error.
///
/// Only a state-edge denial surfaces as an invalid transition; every other
/// denial, including a report the actor cannot see, is `Unauthorized`.
#[must_use]
pub fn translate_denial(action: Action, reason: &DenialReason) -> ApiError {
    match reason {
        DenialReason::IllegalState { .. } => ApiError::InvalidTransition {
            message: reason.to_string(),
        },
        DenialReason::Discarded
        | DenialReason::OutOfScope
        | DenialReason::RoleRequired { .. }
        | DenialReason::Locked { .. } => ApiError::Unauthorized {
            action: action.as_str().to_string(),
            reason: reason.to_string(),
        },
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidReportState(msg) => ApiError::InvalidInput {
            field: String::from("state"),
            message: msg,
        },
        DomainError::InvalidFormType(msg) => ApiError::InvalidInput {
            field: String::from("form_type"),
            message: format!("Unknown form type '{msg}'"),
        },
        DomainError::InvalidOrigin(msg) => ApiError::InvalidInput {
            field: String::from("origin"),
            message: msg,
        },
        DomainError::InvalidPriority(msg) => ApiError::InvalidInput {
            field: String::from("priority"),
            message: format!("Unknown priority '{msg}'"),
        },
        DomainError::InvalidResolution(msg) => ApiError::InvalidInput {
            field: String::from("resolution"),
            message: format!("Unknown resolution '{msg}'"),
        },
        DomainError::InvalidOrganizationKind(msg) | DomainError::InvalidTerritoryKind(msg) => {
            ApiError::Internal { message: msg }
        }
        err @ (DomainError::InvalidTransition { .. }
        | DomainError::NotEditable { .. }
        | DomainError::ReportDiscarded(_)
        | DomainError::ReportNotDiscarded(_)) => ApiError::InvalidTransition {
            message: err.to_string(),
        },
        DomainError::RoutingMismatch { office_id, reason } => ApiError::RoutingMismatch {
            office_id,
            reason: reason.to_string(),
        },
        DomainError::UnknownCommune(code) => ApiError::InvalidInput {
            field: String::from("commune"),
            message: format!("Unknown commune '{code}'"),
        },
        DomainError::DdfipNotFound { code_departement } => ApiError::InvalidInput {
            field: String::from("commune"),
            message: format!("No DDFIP handles departement {code_departement}"),
        },
        err @ DomainError::CollectivityNotManaged { .. } => ApiError::Unauthorized {
            action: String::from("create"),
            reason: err.to_string(),
        },
        err @ (DomainError::SandboxMismatch { .. } | DomainError::SandboxRequiresPublisher) => {
            ApiError::InvalidInput {
                field: String::from("sandbox"),
                message: err.to_string(),
            }
        }
        DomainError::InvalidReference(reference) => ApiError::InvalidInput {
            field: String::from("reference"),
            message: format!("Invalid reference '{reference}'"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// A stale compare-and-swap becomes `Conflict`; missing rows become
/// `NotFound`; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::ReportNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Report"),
            message: format!("Report {id} does not exist"),
        },
        PersistenceError::UserNotFound(id) => ApiError::NotFound {
            resource_type: String::from("User"),
            message: format!("User {id} does not exist"),
        },
        PersistenceError::OrganizationNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Organization"),
            message: format!("Organization {id} does not exist"),
        },
        PersistenceError::OfficeNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Office"),
            message: format!("Office {id} does not exist"),
        },
        PersistenceError::NotFound(msg) => ApiError::NotFound {
            resource_type: String::from("Resource"),
            message: msg,
        },
        err @ PersistenceError::StaleWrite { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
