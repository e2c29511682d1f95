// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the signalements platform.
//!
//! Reports, packages, reference data and the audit trail live in a single
//! `SQLite` database managed through Diesel with embedded migrations.
//!
//! ## Write model
//!
//! Every report write is a compare-and-swap on `lock_version` performed in the
//! same transaction as the audit event it produces. A write based on a stale
//! read affects no row and fails with [`PersistenceError::StaleWrite`].
//! Package transmission writes the packages and all of their member reports
//! in one transaction.
//!
//! ## Visibility
//!
//! Listing reports or packages takes the visibility scope computed by the
//! policy layer and translates it into a SQL predicate (see `queries::scope`).

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

use diesel::SqliteConnection;
use diesel::prelude::*;
use signalements::{CreationResult, TransitionResult};
use signalements_audit::AuditEvent;
use signalements_domain::{
    Commune, FormType, Office, Organization, Package, PackageScope, Report, ReportScope,
    Territory, User, format_reference,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod seed;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use seed::{Seed, SeedError, SeedSummary};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// Each call gets its own shared-cache database name, so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:signalements_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a file-based database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------

    /// Loads seed data in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any row cannot be written; nothing is written then.
    pub fn load_seed(&mut self, seed: &Seed) -> Result<SeedSummary, PersistenceError> {
        let summary: SeedSummary = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            for organization in seed.organizations_in_insert_order() {
                mutations::reference_data::insert_organization(conn, organization)?;
            }
            for commune in &seed.communes {
                mutations::reference_data::insert_commune(conn, commune)?;
            }
            for user in &seed.users {
                mutations::reference_data::insert_user(conn, user)?;
            }
            for office in &seed.offices {
                mutations::offices::insert_office(conn, office)?;
            }
            Ok(SeedSummary {
                communes: seed.communes.len(),
                organizations: seed.organizations.len(),
                users: seed.users.len(),
                offices: seed.offices.len(),
            })
        })?;

        info!(
            communes = summary.communes,
            organizations = summary.organizations,
            users = summary.users,
            offices = summary.offices,
            "Loaded seed data"
        );
        Ok(summary)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_commune(&mut self, commune: &Commune) -> Result<(), PersistenceError> {
        mutations::reference_data::insert_commune(&mut self.conn, commune)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_organization(&mut self, organization: &Organization) -> Result<(), PersistenceError> {
        mutations::reference_data::insert_organization(&mut self.conn, organization)
    }

    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn insert_user(&mut self, user: &User) -> Result<(), PersistenceError> {
        self.conn
            .transaction(|conn| mutations::reference_data::insert_user(conn, user))
    }

    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn insert_office(&mut self, office: &Office) -> Result<(), PersistenceError> {
        self.conn
            .transaction(|conn| mutations::offices::insert_office(conn, office))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_territory(&mut self) -> Result<Territory, PersistenceError> {
        queries::territory::load_territory(&mut self.conn)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if no such user exists.
    pub fn get_user(&mut self, user_id: i64) -> Result<User, PersistenceError> {
        queries::organizations::get_user(&mut self.conn, user_id)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::OrganizationNotFound` if no such organization exists.
    pub fn get_organization(&mut self, organization_id: i64) -> Result<Organization, PersistenceError> {
        queries::organizations::get_organization(&mut self.conn, organization_id)
    }

    // ------------------------------------------------------------------
    // Offices
    // ------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `PersistenceError::OfficeNotFound` if no such office exists.
    pub fn get_office(&mut self, office_id: i64) -> Result<Office, PersistenceError> {
        queries::offices::get_office(&mut self.conn, office_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_offices_for_ddfip(&mut self, ddfip_id: i64) -> Result<Vec<Office>, PersistenceError> {
        queries::offices::list_offices_for_ddfip(&mut self.conn, ddfip_id)
    }

    /// Replaces the competences and/or members of an office.
    ///
    /// `None` leaves the corresponding set untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the office does not exist or a write fails.
    pub fn update_office(
        &mut self,
        office_id: i64,
        competences: Option<&BTreeSet<FormType>>,
        member_ids: Option<&BTreeSet<i64>>,
    ) -> Result<Office, PersistenceError> {
        let office: Office = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            queries::offices::get_office(conn, office_id)?;
            if let Some(competences) = competences {
                mutations::offices::replace_competences(conn, office_id, competences)?;
            }
            if let Some(member_ids) = member_ids {
                mutations::offices::replace_members(conn, office_id, member_ids)?;
            }
            queries::offices::get_office(conn, office_id)
        })?;

        info!(
            office_id,
            competences = office.competences.len(),
            members = office.member_ids.len(),
            "Updated office"
        );
        Ok(office)
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Allocates the next monthly report reference, e.g. `2026-10-0003`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn next_report_reference(&mut self, at: OffsetDateTime) -> Result<String, PersistenceError> {
        let prefix: String = reference_prefix(at);
        let count: i64 = queries::reports::count_report_references(&mut self.conn, &prefix)?;
        next_reference(at, count)
    }

    /// Stores a newly created report together with its creation event.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; nothing is written then.
    pub fn create_report(&mut self, result: &CreationResult) -> Result<Report, PersistenceError> {
        let report: Report = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            let report_id: i64 = mutations::reports::insert_report(conn, &result.report)?;
            let event: AuditEvent = result.audit_event.clone().for_report(report_id);
            mutations::audit::insert_audit_event(conn, &event)?;
            queries::reports::get_report(conn, report_id)
        })?;

        info!(
            report_id = report.report_id,
            reference = %report.reference,
            form_type = %report.form_type,
            "Created report"
        );
        Ok(report)
    }

    /// Loads a report by id, discarded or not.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReportNotFound` if no such report exists.
    pub fn get_report(&mut self, report_id: i64) -> Result<Report, PersistenceError> {
        queries::reports::get_report(&mut self.conn, report_id)
    }

    /// Lists the reports visible through `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reports(&mut self, scope: &ReportScope) -> Result<Vec<Report>, PersistenceError> {
        queries::reports::list_reports(&mut self.conn, scope)
    }

    /// Writes a transition and its audit event atomically.
    ///
    /// # Returns
    ///
    /// The id of the persisted audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleWrite` if the report changed since
    /// `result.previous` was read; nothing is written then.
    pub fn persist_transition(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        let event_id: i64 = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            mutations::reports::compare_and_swap_report(
                conn,
                result.previous.lock_version,
                &result.new_report,
            )?;
            mutations::audit::insert_audit_event(conn, &result.audit_event)
        })?;

        info!(
            report_id = result.new_report.report_id,
            event_id,
            action = %result.audit_event.action.name,
            from = %result.previous.state,
            to = %result.new_report.state,
            "Persisted report transition"
        );
        Ok(event_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_trail(&mut self, report_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_trail(&mut self.conn, report_id)
    }

    // ------------------------------------------------------------------
    // Packages
    // ------------------------------------------------------------------

    /// Allocates the next monthly package reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn next_package_reference(&mut self, at: OffsetDateTime) -> Result<String, PersistenceError> {
        let prefix: String = reference_prefix(at);
        let count: i64 = queries::packages::count_package_references(&mut self.conn, &prefix)?;
        next_reference(at, count)
    }

    /// Allocates `count` consecutive monthly package references.
    ///
    /// Nothing is reserved: the references stay free until the packages using
    /// them are written.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn next_package_references(
        &mut self,
        at: OffsetDateTime,
        count: usize,
    ) -> Result<Vec<String>, PersistenceError> {
        let prefix: String = reference_prefix(at);
        let existing: i64 = queries::packages::count_package_references(&mut self.conn, &prefix)?;
        (0..count)
            .map(|offset| {
                let offset: i64 = i64::try_from(offset).map_err(|_| {
                    PersistenceError::InvalidStoredValue(format!(
                        "reference sequence overflow: {offset}"
                    ))
                })?;
                next_reference(at, existing + offset)
            })
            .collect()
    }

    /// Writes a package and the transmission of each member report in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails, including a stale member report;
    /// nothing is written then.
    pub fn persist_transmission(
        &mut self,
        package: &Package,
        transitions: &[TransitionResult],
    ) -> Result<Package, PersistenceError> {
        let stored: Package = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            write_transmission(conn, package, transitions)
        })?;

        info!(
            package_id = stored.package_id,
            reference = %stored.reference,
            ddfip_id = stored.ddfip_id,
            sandbox = stored.sandbox,
            reports = transitions.len(),
            "Persisted package transmission"
        );
        Ok(stored)
    }

    /// Writes several packages and their member reports in one transaction.
    ///
    /// Either every package of the batch is written, or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails, including a stale member report
    /// or a reference already taken; nothing is written then.
    pub fn persist_transmissions(
        &mut self,
        batch: &[(Package, Vec<TransitionResult>)],
    ) -> Result<Vec<Package>, PersistenceError> {
        let stored: Vec<Package> = self.conn.transaction::<_, PersistenceError, _>(|conn| {
            batch
                .iter()
                .map(|(package, transitions)| write_transmission(conn, package, transitions))
                .collect()
        })?;

        info!(
            packages = stored.len(),
            reports = batch.iter().map(|(_, transitions)| transitions.len()).sum::<usize>(),
            "Persisted package transmissions"
        );
        Ok(stored)
    }

    /// Lists the packages visible through `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_packages(&mut self, scope: &PackageScope) -> Result<Vec<Package>, PersistenceError> {
        queries::packages::list_packages(&mut self.conn, scope)
    }
}

fn write_transmission(
    conn: &mut SqliteConnection,
    package: &Package,
    transitions: &[TransitionResult],
) -> Result<Package, PersistenceError> {
    let package_id: i64 = mutations::packages::insert_package(conn, package)?;
    for result in transitions {
        mutations::reports::compare_and_swap_report(
            conn,
            result.previous.lock_version,
            &result.new_report,
        )?;
        mutations::audit::insert_audit_event(conn, &result.audit_event)?;
    }
    queries::packages::get_package(conn, package_id)
}

fn reference_prefix(at: OffsetDateTime) -> String {
    format!("{:04}-{:02}-", at.year(), u8::from(at.month()))
}

fn next_reference(at: OffsetDateTime, existing: i64) -> Result<String, PersistenceError> {
    let sequence: u32 = u32::try_from(existing + 1).map_err(|_| {
        PersistenceError::InvalidStoredValue(format!("reference sequence overflow: {existing}"))
    })?;
    Ok(format_reference(at, sequence))
}
