// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visibility predicates over reports and packages.
//!
//! A scope is a disjunction of clauses; a clause is a conjunction of the
//! conditions it sets, an unset condition matching everything. Discarded rows
//! never match. The same predicate is evaluated in memory here and translated
//! to SQL by the persistence layer.

use crate::report::{Package, Report};
use crate::report_state::ReportState;
use crate::types::{FormType, Origin};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One conjunctive clause of a [`ReportScope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeClause {
    pub states: Option<BTreeSet<ReportState>>,
    pub sandbox: Option<bool>,
    /// Matches the DDFIP stored at transmission.
    pub ddfip_id: Option<i64>,
    pub office_ids: Option<BTreeSet<i64>>,
    pub form_types: Option<BTreeSet<FormType>>,
    pub collectivity_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub origin: Option<Origin>,
}

impl ScopeClause {
    /// Returns true if every condition set on the clause holds for `report`.
    #[must_use]
    pub fn matches(&self, report: &Report) -> bool {
        self.states
            .as_ref()
            .is_none_or(|states| states.contains(&report.state))
            && self.sandbox.is_none_or(|sandbox| sandbox == report.sandbox)
            && self
                .ddfip_id
                .is_none_or(|ddfip_id| report.ddfip_id == Some(ddfip_id))
            && self.office_ids.as_ref().is_none_or(|office_ids| {
                report
                    .office_id
                    .is_some_and(|office_id| office_ids.contains(&office_id))
            })
            && self
                .form_types
                .as_ref()
                .is_none_or(|form_types| form_types.contains(&report.form_type))
            && self
                .collectivity_id
                .is_none_or(|collectivity_id| collectivity_id == report.collectivity_id)
            && self
                .publisher_id
                .is_none_or(|publisher_id| report.publisher_id == Some(publisher_id))
            && self.origin.is_none_or(|origin| origin == report.origin)
    }
}

/// Reports an actor may see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportScope {
    pub clauses: Vec<ScopeClause>,
}

impl ReportScope {
    /// A scope matching nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn includes(&self, report: &Report) -> bool {
        !report.is_discarded() && self.clauses.iter().any(|clause| clause.matches(report))
    }
}

/// One conjunctive clause of a [`PackageScope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageClause {
    pub sandbox: Option<bool>,
    pub ddfip_id: Option<i64>,
    pub collectivity_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub origin: Option<Origin>,
}

impl PackageClause {
    #[must_use]
    pub fn matches(&self, package: &Package) -> bool {
        self.sandbox.is_none_or(|sandbox| sandbox == package.sandbox)
            && self.ddfip_id.is_none_or(|ddfip_id| ddfip_id == package.ddfip_id)
            && self
                .collectivity_id
                .is_none_or(|collectivity_id| collectivity_id == package.collectivity_id)
            && self
                .publisher_id
                .is_none_or(|publisher_id| package.publisher_id == Some(publisher_id))
            && self.origin.is_none_or(|origin| origin == package.origin)
    }
}

/// Packages an actor may see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageScope {
    pub clauses: Vec<PackageClause>,
}

impl PackageScope {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn includes(&self, package: &Package) -> bool {
        !package.is_discarded() && self.clauses.iter().any(|clause| clause.matches(package))
    }
}
