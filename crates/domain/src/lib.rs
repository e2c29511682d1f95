// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod office;
mod organization;
mod report;
mod report_state;
mod routing;
mod scope;
mod territory;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use office::Office;
pub use organization::{
    Collectivity, CollectivityTerritory, Ddfip, Dgfip, Organization, OrganizationKind, Publisher,
    User,
};
pub use report::{NewReport, Package, PackageProvenance, Report, ReportChanges, format_reference};
pub use report_state::{ASSIGNED_ONWARD, ReportEvent, ReportState, TRANSMITTED_ONWARD};
pub use routing::{
    RoutingMismatch, check_office_eligibility, is_assigned_office_member, route_candidates,
};
pub use scope::{PackageClause, PackageScope, ReportScope, ScopeClause};
pub use territory::{Commune, Territory};
pub use types::{FormType, Origin, Priority, Resolution};
