// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-actor authorization of report, package and office actions.
//!
//! A report action is checked in a fixed order:
//!
//! 1. a discarded report only answers to `discard` and `undiscard`;
//! 2. the report must be visible to the actor;
//! 3. the actor's role and ownership must allow the action;
//! 4. the lifecycle must allow the action from the report's state.
//!
//! Visibility here and the scope built in [`crate::scope`] describe the same
//! set of reports and are tested against each other.

use serde::{Deserialize, Serialize};
use signalements_domain::{
    ASSIGNED_ONWARD, Office, Organization, Origin, Package, Report, ReportEvent, ReportState,
    Resolution, TRANSMITTED_ONWARD, is_assigned_office_member,
};
use std::str::FromStr;
use thiserror::Error;

use crate::auth::AuthenticatedActor;
use crate::scope::package_scope;

/// Every action name a caller may ask about, aliases included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Index,
    Show,
    New,
    Create,
    Edit,
    Update,
    Remove,
    Destroy,
    MarkReady,
    Transmit,
    Accept,
    Assign,
    Resolve,
    Confirm,
    Reject,
    Undiscard,
}

impl Action {
    pub const ALL: [Self; 16] = [
        Self::Index,
        Self::Show,
        Self::New,
        Self::Create,
        Self::Edit,
        Self::Update,
        Self::Remove,
        Self::Destroy,
        Self::MarkReady,
        Self::Transmit,
        Self::Accept,
        Self::Assign,
        Self::Resolve,
        Self::Confirm,
        Self::Reject,
        Self::Undiscard,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Show => "show",
            Self::New => "new",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Destroy => "destroy",
            Self::MarkReady => "mark_ready",
            Self::Transmit => "transmit",
            Self::Accept => "accept",
            Self::Assign => "assign",
            Self::Resolve => "resolve",
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::Undiscard => "undiscard",
        }
    }

    /// Returns the rule guarding this action.
    #[must_use]
    pub const fn rule(self) -> Rule {
        match self {
            Self::Index | Self::Show => Rule::View,
            Self::New | Self::Create => Rule::Create,
            Self::Edit | Self::Update => Rule::Update,
            Self::Remove | Self::Destroy => Rule::Destroy,
            Self::MarkReady => Rule::MarkReady,
            Self::Transmit => Rule::Transmit,
            Self::Accept => Rule::Accept,
            Self::Assign => Rule::Assign,
            Self::Resolve => Rule::Resolve,
            Self::Confirm => Rule::Confirm,
            Self::Reject => Rule::Reject,
            Self::Undiscard => Rule::Undiscard,
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown action '{s}'"))
    }
}

/// One guard, shared by every alias of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    View,
    Create,
    Update,
    Destroy,
    MarkReady,
    Transmit,
    Accept,
    Assign,
    Resolve,
    Confirm,
    Reject,
    Undiscard,
}

impl Rule {
    /// Returns the lifecycle event whose source states gate this rule.
    const fn event(self) -> Option<ReportEvent> {
        match self {
            Self::MarkReady => Some(ReportEvent::MarkReady),
            Self::Transmit => Some(ReportEvent::Transmit),
            Self::Accept => Some(ReportEvent::Accept),
            Self::Assign => Some(ReportEvent::Assign),
            // Both resolutions share their source states.
            Self::Resolve => Some(ReportEvent::Resolve(Resolution::Applicable)),
            Self::Confirm => Some(ReportEvent::Confirm),
            Self::Reject => Some(ReportEvent::Reject),
            Self::View | Self::Create | Self::Update | Self::Destroy | Self::Undiscard => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "discard",
            Self::MarkReady => "mark ready",
            Self::Transmit => "transmit",
            Self::Accept => "accept",
            Self::Assign => "assign",
            Self::Resolve => "resolve",
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::Undiscard => "undiscard",
        }
    }
}

/// Why the policy refused an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    #[error("report is discarded")]
    Discarded,
    #[error("report is outside the actor's scope")]
    OutOfScope,
    #[error("{action} requires {required}")]
    RoleRequired {
        action: &'static str,
        required: &'static str,
    },
    #[error("report is {state}; its creator may only change draft or ready reports")]
    Locked { state: ReportState },
    #[error("cannot {action} a report in state '{state}'")]
    IllegalState {
        action: &'static str,
        state: ReportState,
    },
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Converts the decision into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the denial reason if the action is denied.
    pub fn into_result(self) -> Result<(), DenialReason> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(reason),
        }
    }
}

const fn role_required(rule: Rule, required: &'static str) -> DenialReason {
    DenialReason::RoleRequired {
        action: rule.name(),
        required,
    }
}

/// Decides whether `actor` may perform `action`, optionally on `report`.
///
/// Without a report the check is the collection-level one: may this actor
/// list, create or act on reports at all.
#[must_use]
pub fn authorize(actor: &AuthenticatedActor, action: Action, report: Option<&Report>) -> Decision {
    let rule: Rule = action.rule();
    let Some(report) = report else {
        return authorize_collection(actor, rule);
    };

    if report.is_discarded() && !matches!(rule, Rule::Destroy | Rule::Undiscard) {
        return Decision::Denied(DenialReason::Discarded);
    }

    let super_admin_override: bool =
        actor.is_super_admin() && matches!(rule, Rule::Destroy | Rule::Undiscard);
    if !super_admin_override && !can_view(actor, report) {
        return Decision::Denied(DenialReason::OutOfScope);
    }

    let role_check: Result<(), DenialReason> = if super_admin_override {
        Ok(())
    } else {
        check_role(actor, rule, report)
    };
    if let Err(reason) = role_check {
        return Decision::Denied(reason);
    }

    if rule
        .event()
        .is_some_and(|event| !event.is_allowed_from(report.state))
    {
        return Decision::Denied(DenialReason::IllegalState {
            action: rule.name(),
            state: report.state,
        });
    }

    Decision::Allowed
}

fn authorize_collection(actor: &AuthenticatedActor, rule: Rule) -> Decision {
    let allowed: bool = match rule {
        Rule::View => true,
        Rule::Create | Rule::Transmit | Rule::Update | Rule::MarkReady => is_reporter(actor),
        Rule::Destroy | Rule::Undiscard => is_reporter(actor) || actor.is_super_admin(),
        Rule::Accept | Rule::Assign | Rule::Confirm | Rule::Reject => {
            matches!(actor.organization, Organization::Publisher(_))
                || (actor.ddfip_id().is_some()
                    && (actor.user.organization_admin || actor.user.is_form_admin()))
        }
        Rule::Resolve => matches!(
            actor.organization,
            Organization::Publisher(_) | Organization::Ddfip(_)
        ),
    };

    if allowed {
        Decision::Allowed
    } else {
        Decision::Denied(role_required(rule, required_role(rule)))
    }
}

const fn required_role(rule: Rule) -> &'static str {
    match rule {
        Rule::View => "nothing",
        Rule::Create | Rule::Transmit | Rule::Update | Rule::MarkReady => {
            "a collectivity or publisher user"
        }
        Rule::Destroy | Rule::Undiscard => "the report's creator or a super-admin",
        Rule::Accept | Rule::Assign | Rule::Confirm | Rule::Reject => "a DDFIP admin",
        Rule::Resolve => "a DDFIP admin or a member of the assigned office",
    }
}

const fn is_reporter(actor: &AuthenticatedActor) -> bool {
    matches!(
        actor.organization,
        Organization::Collectivity(_) | Organization::Publisher(_)
    )
}

/// Returns true if `report` is visible to `actor`, ignoring discard.
#[must_use]
pub fn can_view(actor: &AuthenticatedActor, report: &Report) -> bool {
    match &actor.organization {
        Organization::Collectivity(collectivity) => {
            report.collectivity_id == collectivity.collectivity_id
                && (report.origin == Origin::WebUi
                    || (!report.sandbox && TRANSMITTED_ONWARD.contains(&report.state)))
        }
        Organization::Publisher(publisher) => report.publisher_id == Some(publisher.publisher_id),
        Organization::Ddfip(ddfip) => {
            if report.sandbox || report.ddfip_id != Some(ddfip.ddfip_id) {
                return false;
            }
            let as_admin: bool = TRANSMITTED_ONWARD.contains(&report.state)
                && (actor.user.organization_admin
                    || actor.user.form_admin_types.contains(&report.form_type));
            let as_member: bool = ASSIGNED_ONWARD.contains(&report.state)
                && is_assigned_office_member(&actor.user, report);
            as_admin || as_member
        }
        Organization::Dgfip(_) => !report.sandbox && TRANSMITTED_ONWARD.contains(&report.state),
    }
}

/// Returns true if `actor` created `report` and still owns it.
///
/// Collectivities own their web reports; publishers own the reports they
/// created through the API.
#[must_use]
pub fn is_creator(actor: &AuthenticatedActor, report: &Report) -> bool {
    match &actor.organization {
        Organization::Collectivity(collectivity) => {
            report.collectivity_id == collectivity.collectivity_id
                && report.origin == Origin::WebUi
        }
        Organization::Publisher(publisher) => report.publisher_id == Some(publisher.publisher_id),
        Organization::Ddfip(_) | Organization::Dgfip(_) => false,
    }
}

/// A publisher plays the DDFIP side on its own sandbox reports.
fn simulates_ddfip(actor: &AuthenticatedActor, report: &Report) -> bool {
    report.sandbox
        && matches!(
            &actor.organization,
            Organization::Publisher(publisher) if report.publisher_id == Some(publisher.publisher_id)
        )
}

fn administers(actor: &AuthenticatedActor, report: &Report) -> bool {
    report
        .ddfip_id
        .is_some_and(|ddfip_id| actor.administers(ddfip_id, report.form_type))
}

fn check_role(actor: &AuthenticatedActor, rule: Rule, report: &Report) -> Result<(), DenialReason> {
    match rule {
        Rule::View => Ok(()),
        Rule::Create => authorize_collection(actor, rule).into_result(),
        Rule::Update | Rule::Destroy | Rule::Undiscard => {
            if !is_creator(actor, report) {
                return Err(role_required(rule, required_role(rule)));
            }
            if !report.state.is_editable() {
                return Err(DenialReason::Locked {
                    state: report.state,
                });
            }
            Ok(())
        }
        Rule::MarkReady | Rule::Transmit => {
            if is_creator(actor, report) {
                Ok(())
            } else {
                Err(role_required(rule, "the report's creator"))
            }
        }
        Rule::Accept | Rule::Assign | Rule::Confirm | Rule::Reject => {
            if administers(actor, report) || simulates_ddfip(actor, report) {
                Ok(())
            } else {
                Err(role_required(rule, required_role(rule)))
            }
        }
        Rule::Resolve => {
            let office_member: bool = actor.ddfip_id().is_some()
                && report.ddfip_id == actor.ddfip_id()
                && is_assigned_office_member(&actor.user, report);
            if administers(actor, report) || office_member || simulates_ddfip(actor, report) {
                Ok(())
            } else {
                Err(role_required(rule, required_role(rule)))
            }
        }
    }
}

/// Decides whether `actor` may perform `action` on `package`.
///
/// Packages are read-only once written; only viewing is ever allowed.
#[must_use]
pub fn authorize_package(actor: &AuthenticatedActor, action: Action, package: &Package) -> Decision {
    let rule: Rule = action.rule();
    if rule != Rule::View {
        return Decision::Denied(role_required(rule, "nothing: packages are read-only"));
    }
    if package.is_discarded() {
        return Decision::Denied(DenialReason::Discarded);
    }
    if package_scope(actor).includes(package) {
        Decision::Allowed
    } else {
        Decision::Denied(DenialReason::OutOfScope)
    }
}

/// Decides whether `actor` may change the competences or members of `office`.
#[must_use]
pub fn authorize_manage_office(actor: &AuthenticatedActor, office: &Office) -> Decision {
    if actor.is_super_admin() || actor.is_ddfip_admin_of(office.ddfip_id) {
        Decision::Allowed
    } else {
        Decision::Denied(DenialReason::RoleRequired {
            action: "manage office",
            required: "an admin of the owning DDFIP",
        })
    }
}
