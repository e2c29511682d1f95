// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an actor is permitted to perform
//! without leaking policy internals. They are advisory only and do not
//! replace the checks made when an action is executed.

use signalements_domain::{Organization, Report};

use crate::auth::AuthenticatedActor;
use crate::policy::{Action, authorize};
use crate::request_response::{Capability, GlobalCapabilities, ReportCapabilities};
use crate::scope::package_scope;

/// Computes collection-level capabilities for an actor.
#[must_use]
pub fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    let allowed = |action: Action| Capability::from_bool(authorize(actor, action, None).is_allowed());
    let manages_offices: bool = actor.is_super_admin()
        || (matches!(actor.organization, Organization::Ddfip(_)) && actor.user.organization_admin);

    GlobalCapabilities {
        can_create_report: allowed(Action::Create),
        can_transmit: allowed(Action::Transmit),
        can_list_packages: Capability::from_bool(!package_scope(actor).is_empty()),
        can_manage_offices: Capability::from_bool(manages_offices),
    }
}

/// Computes the capabilities of `actor` on `report`.
///
/// Each flag is the policy decision for the corresponding action, so a
/// flag is allowed exactly when executing the action would pass the policy.
#[must_use]
pub fn compute_report_capabilities(
    actor: &AuthenticatedActor,
    report: &Report,
) -> ReportCapabilities {
    let allowed =
        |action: Action| Capability::from_bool(authorize(actor, action, Some(report)).is_allowed());

    ReportCapabilities {
        can_view: allowed(Action::Show),
        can_update: allowed(Action::Update),
        can_discard: Capability::from_bool(
            !report.is_discarded() && allowed(Action::Destroy).is_allowed(),
        ),
        can_undiscard: Capability::from_bool(
            report.is_discarded() && allowed(Action::Undiscard).is_allowed(),
        ),
        can_mark_ready: allowed(Action::MarkReady),
        can_transmit: allowed(Action::Transmit),
        can_accept: allowed(Action::Accept),
        can_assign: allowed(Action::Assign),
        can_resolve: allowed(Action::Resolve),
        can_confirm: allowed(Action::Confirm),
        can_reject: allowed(Action::Reject),
    }
}
