// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Translation of visibility scopes into SQL predicates.
//!
//! Each clause becomes a conjunction seeded with `1 = 1`; clauses are joined
//! with `OR`. Nullable columns are compared with `assume_not_null()`: a NULL
//! compares as unknown and the row is filtered out, matching the in-memory
//! semantics where an unset value never equals a required one. An empty scope
//! has no predicate at all and callers return no rows.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;
use signalements_domain::{
    FormType, PackageClause, PackageScope, ReportScope, ReportState, ScopeClause,
};

use crate::diesel_schema::{packages, reports};

pub type ReportFilter = Box<dyn BoxableExpression<reports::table, Sqlite, SqlType = Bool>>;
pub type PackageFilter = Box<dyn BoxableExpression<packages::table, Sqlite, SqlType = Bool>>;

fn report_clause_filter(clause: &ScopeClause) -> ReportFilter {
    let mut filter: ReportFilter = Box::new(sql::<Bool>("1 = 1"));

    if let Some(states) = &clause.states {
        let names: Vec<&'static str> = states.iter().map(ReportState::as_str).collect();
        filter = Box::new(filter.and(reports::state.eq_any(names)));
    }
    if let Some(sandbox) = clause.sandbox {
        filter = Box::new(filter.and(reports::sandbox.eq(sandbox)));
    }
    if let Some(ddfip_id) = clause.ddfip_id {
        filter = Box::new(filter.and(reports::ddfip_id.assume_not_null().eq(ddfip_id)));
    }
    if let Some(office_ids) = &clause.office_ids {
        let ids: Vec<i64> = office_ids.iter().copied().collect();
        filter = Box::new(filter.and(reports::office_id.assume_not_null().eq_any(ids)));
    }
    if let Some(form_types) = &clause.form_types {
        let names: Vec<&'static str> = form_types.iter().map(FormType::as_str).collect();
        filter = Box::new(filter.and(reports::form_type.eq_any(names)));
    }
    if let Some(collectivity_id) = clause.collectivity_id {
        filter = Box::new(filter.and(reports::collectivity_id.eq(collectivity_id)));
    }
    if let Some(publisher_id) = clause.publisher_id {
        filter = Box::new(filter.and(reports::publisher_id.assume_not_null().eq(publisher_id)));
    }
    if let Some(origin) = clause.origin {
        filter = Box::new(filter.and(reports::origin.eq(origin.as_str())));
    }

    filter
}

/// Builds the SQL predicate for `scope`, or `None` if it matches nothing.
///
/// Discarded reports are excluded by the predicate itself.
#[must_use]
pub fn report_filter(scope: &ReportScope) -> Option<ReportFilter> {
    let disjunction: ReportFilter = scope
        .clauses
        .iter()
        .map(report_clause_filter)
        .reduce(|acc, next| Box::new(acc.or(next)))?;
    Some(Box::new(reports::discarded_at.is_null().and(disjunction)))
}

fn package_clause_filter(clause: &PackageClause) -> PackageFilter {
    let mut filter: PackageFilter = Box::new(sql::<Bool>("1 = 1"));

    if let Some(sandbox) = clause.sandbox {
        filter = Box::new(filter.and(packages::sandbox.eq(sandbox)));
    }
    if let Some(ddfip_id) = clause.ddfip_id {
        filter = Box::new(filter.and(packages::ddfip_id.eq(ddfip_id)));
    }
    if let Some(collectivity_id) = clause.collectivity_id {
        filter = Box::new(filter.and(packages::collectivity_id.eq(collectivity_id)));
    }
    if let Some(publisher_id) = clause.publisher_id {
        filter = Box::new(filter.and(packages::publisher_id.assume_not_null().eq(publisher_id)));
    }
    if let Some(origin) = clause.origin {
        filter = Box::new(filter.and(packages::origin.eq(origin.as_str())));
    }

    filter
}

/// Builds the SQL predicate for `scope`, or `None` if it matches nothing.
#[must_use]
pub fn package_filter(scope: &PackageScope) -> Option<PackageFilter> {
    let disjunction: PackageFilter = scope
        .clauses
        .iter()
        .map(package_clause_filter)
        .reduce(|acc, next| Box::new(acc.or(next)))?;
    Some(Box::new(packages::discarded_at.is_null().and(disjunction)))
}
