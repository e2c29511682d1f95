// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary of the signalements platform.
//!
//! This crate owns who may do what: the policy engine deciding single
//! actions, the scopes filtering lists, advisory capabilities, and the
//! handlers that tie policy, core and persistence together. Transport is
//! left to the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod policy;
mod request_response;
mod scope;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService};
pub use capabilities::{compute_global_capabilities, compute_report_capabilities};
pub use error::{
    ApiError, translate_core_error, translate_denial, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    bulk_transition, create_report, get_report, list_packages, list_reports, report_audit_trail,
    report_capabilities, route_candidates, transition, transmit_reports, update_office,
    update_report,
};
pub use policy::{
    Action, Decision, DenialReason, Rule, authorize, authorize_manage_office, authorize_package,
    can_view, is_creator,
};
pub use request_response::{
    BulkItemOutcome, BulkItemStatus, BulkTransitionRequest, BulkTransitionResponse, Capability,
    CreateReportRequest, GlobalCapabilities, ReportCapabilities, TransitionRequest,
    TransmitReportsRequest, TransmitReportsResponse, UpdateOfficeRequest, UpdateReportRequest,
};
pub use scope::{ResourceKind, ScopeFilter, package_scope, report_scope, scope_filter};
