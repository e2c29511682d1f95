// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visibility scopes per actor.
//!
//! A report scope includes exactly the reports [`crate::policy::can_view`]
//! accepts, minus discarded ones.

use serde::{Deserialize, Serialize};
use signalements_domain::{
    ASSIGNED_ONWARD, Organization, Origin, PackageClause, PackageScope, ReportScope, ScopeClause,
    TRANSMITTED_ONWARD,
};

use crate::auth::AuthenticatedActor;

/// The kind of resource being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Report,
    Package,
}

/// A scope over one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    Reports(ReportScope),
    Packages(PackageScope),
}

/// Builds the visibility scope of `actor` for `kind`.
#[must_use]
pub fn scope_filter(actor: &AuthenticatedActor, kind: ResourceKind) -> ScopeFilter {
    match kind {
        ResourceKind::Report => ScopeFilter::Reports(report_scope(actor)),
        ResourceKind::Package => ScopeFilter::Packages(package_scope(actor)),
    }
}

/// Builds the reports visible to `actor`.
#[must_use]
pub fn report_scope(actor: &AuthenticatedActor) -> ReportScope {
    let clauses: Vec<ScopeClause> = match &actor.organization {
        Organization::Collectivity(collectivity) => vec![
            ScopeClause {
                collectivity_id: Some(collectivity.collectivity_id),
                origin: Some(Origin::WebUi),
                ..ScopeClause::default()
            },
            ScopeClause {
                collectivity_id: Some(collectivity.collectivity_id),
                sandbox: Some(false),
                states: Some(TRANSMITTED_ONWARD.into_iter().collect()),
                ..ScopeClause::default()
            },
        ],
        Organization::Publisher(publisher) => vec![ScopeClause {
            publisher_id: Some(publisher.publisher_id),
            ..ScopeClause::default()
        }],
        Organization::Ddfip(ddfip) => {
            let mut clauses: Vec<ScopeClause> = Vec::new();
            let transmitted: ScopeClause = ScopeClause {
                ddfip_id: Some(ddfip.ddfip_id),
                sandbox: Some(false),
                states: Some(TRANSMITTED_ONWARD.into_iter().collect()),
                ..ScopeClause::default()
            };
            if actor.user.organization_admin {
                clauses.push(transmitted);
            } else if actor.user.is_form_admin() {
                clauses.push(ScopeClause {
                    form_types: Some(actor.user.form_admin_types.clone()),
                    ..transmitted
                });
            }
            if !actor.user.office_ids.is_empty() {
                clauses.push(ScopeClause {
                    ddfip_id: Some(ddfip.ddfip_id),
                    sandbox: Some(false),
                    states: Some(ASSIGNED_ONWARD.into_iter().collect()),
                    office_ids: Some(actor.user.office_ids.clone()),
                    ..ScopeClause::default()
                });
            }
            clauses
        }
        Organization::Dgfip(_) => vec![ScopeClause {
            sandbox: Some(false),
            states: Some(TRANSMITTED_ONWARD.into_iter().collect()),
            ..ScopeClause::default()
        }],
    };

    ReportScope { clauses }
}

/// Builds the packages visible to `actor`.
///
/// Office members without admin rights see reports but no packages.
#[must_use]
pub fn package_scope(actor: &AuthenticatedActor) -> PackageScope {
    let clauses: Vec<PackageClause> = match &actor.organization {
        Organization::Collectivity(collectivity) => vec![
            PackageClause {
                collectivity_id: Some(collectivity.collectivity_id),
                origin: Some(Origin::WebUi),
                ..PackageClause::default()
            },
            PackageClause {
                collectivity_id: Some(collectivity.collectivity_id),
                sandbox: Some(false),
                ..PackageClause::default()
            },
        ],
        Organization::Publisher(publisher) => vec![PackageClause {
            publisher_id: Some(publisher.publisher_id),
            ..PackageClause::default()
        }],
        Organization::Ddfip(ddfip)
            if actor.user.organization_admin || actor.user.is_form_admin() =>
        {
            vec![PackageClause {
                ddfip_id: Some(ddfip.ddfip_id),
                sandbox: Some(false),
                ..PackageClause::default()
            }]
        }
        Organization::Ddfip(_) => Vec::new(),
        Organization::Dgfip(_) => vec![PackageClause {
            sandbox: Some(false),
            ..PackageClause::default()
        }],
    };

    PackageScope { clauses }
}
