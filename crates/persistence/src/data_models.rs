// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to domain values.
//!
//! Enumerations are stored by their `as_str` names and timestamps as RFC 3339
//! text, so the database stays readable with the `sqlite3` shell.

use diesel::prelude::*;
use signalements_domain::{
    Collectivity, CollectivityTerritory, Commune, Ddfip, Dgfip, Organization, Package, Publisher,
    Report,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{communes, organizations, packages, reports};
use crate::error::PersistenceError;

pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.format(&Rfc3339)?)
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}

fn format_optional(at: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    at.map(format_timestamp).transpose()
}

fn parse_optional(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReportRow {
    pub report_id: i64,
    pub reference: String,
    pub origin: String,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    pub sandbox: bool,
    pub commune: String,
    pub form_type: String,
    pub priority: String,
    pub note: Option<String>,
    pub state: String,
    pub ddfip_id: Option<i64>,
    pub office_id: Option<i64>,
    pub package_reference: Option<String>,
    pub resolution_motif: Option<String>,
    pub reponse: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub ready_at: Option<String>,
    pub transmitted_at: Option<String>,
    pub accepted_at: Option<String>,
    pub assigned_at: Option<String>,
    pub resolved_at: Option<String>,
    pub approved_at: Option<String>,
    pub canceled_at: Option<String>,
    pub rejected_at: Option<String>,
    pub discarded_at: Option<String>,
    pub lock_version: i64,
}

impl ReportRow {
    pub fn into_report(self) -> Result<Report, PersistenceError> {
        Ok(Report {
            report_id: self.report_id,
            reference: self.reference,
            origin: self.origin.parse()?,
            collectivity_id: self.collectivity_id,
            publisher_id: self.publisher_id,
            sandbox: self.sandbox,
            commune: self.commune,
            form_type: self.form_type.parse()?,
            priority: self.priority.parse()?,
            note: self.note,
            state: self.state.parse()?,
            ddfip_id: self.ddfip_id,
            office_id: self.office_id,
            package_reference: self.package_reference,
            resolution_motif: self.resolution_motif,
            reponse: self.reponse,
            rejection_reason: self.rejection_reason,
            created_at: parse_timestamp(&self.created_at)?,
            ready_at: parse_optional(self.ready_at.as_deref())?,
            transmitted_at: parse_optional(self.transmitted_at.as_deref())?,
            accepted_at: parse_optional(self.accepted_at.as_deref())?,
            assigned_at: parse_optional(self.assigned_at.as_deref())?,
            resolved_at: parse_optional(self.resolved_at.as_deref())?,
            approved_at: parse_optional(self.approved_at.as_deref())?,
            canceled_at: parse_optional(self.canceled_at.as_deref())?,
            rejected_at: parse_optional(self.rejected_at.as_deref())?,
            discarded_at: parse_optional(self.discarded_at.as_deref())?,
            lock_version: self.lock_version,
        })
    }
}

/// Every report column but the id, used for inserts and full-row updates.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = reports)]
#[diesel(treat_none_as_null = true)]
pub struct ReportWrite {
    pub reference: String,
    pub origin: String,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    pub sandbox: bool,
    pub commune: String,
    pub form_type: String,
    pub priority: String,
    pub note: Option<String>,
    pub state: String,
    pub ddfip_id: Option<i64>,
    pub office_id: Option<i64>,
    pub package_reference: Option<String>,
    pub resolution_motif: Option<String>,
    pub reponse: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub ready_at: Option<String>,
    pub transmitted_at: Option<String>,
    pub accepted_at: Option<String>,
    pub assigned_at: Option<String>,
    pub resolved_at: Option<String>,
    pub approved_at: Option<String>,
    pub canceled_at: Option<String>,
    pub rejected_at: Option<String>,
    pub discarded_at: Option<String>,
    pub lock_version: i64,
}

impl ReportWrite {
    pub fn from_report(report: &Report) -> Result<Self, PersistenceError> {
        Ok(Self {
            reference: report.reference.clone(),
            origin: report.origin.as_str().to_string(),
            collectivity_id: report.collectivity_id,
            publisher_id: report.publisher_id,
            sandbox: report.sandbox,
            commune: report.commune.clone(),
            form_type: report.form_type.as_str().to_string(),
            priority: report.priority.as_str().to_string(),
            note: report.note.clone(),
            state: report.state.as_str().to_string(),
            ddfip_id: report.ddfip_id,
            office_id: report.office_id,
            package_reference: report.package_reference.clone(),
            resolution_motif: report.resolution_motif.clone(),
            reponse: report.reponse.clone(),
            rejection_reason: report.rejection_reason.clone(),
            created_at: format_timestamp(report.created_at)?,
            ready_at: format_optional(report.ready_at)?,
            transmitted_at: format_optional(report.transmitted_at)?,
            accepted_at: format_optional(report.accepted_at)?,
            assigned_at: format_optional(report.assigned_at)?,
            resolved_at: format_optional(report.resolved_at)?,
            approved_at: format_optional(report.approved_at)?,
            canceled_at: format_optional(report.canceled_at)?,
            rejected_at: format_optional(report.rejected_at)?,
            discarded_at: format_optional(report.discarded_at)?,
            lock_version: report.lock_version,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = packages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PackageRow {
    pub package_id: i64,
    pub reference: String,
    pub origin: String,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    pub ddfip_id: i64,
    pub sandbox: bool,
    pub transmitted_at: String,
    pub discarded_at: Option<String>,
}

impl PackageRow {
    pub fn into_package(self) -> Result<Package, PersistenceError> {
        Ok(Package {
            package_id: self.package_id,
            reference: self.reference,
            origin: self.origin.parse()?,
            collectivity_id: self.collectivity_id,
            publisher_id: self.publisher_id,
            ddfip_id: self.ddfip_id,
            sandbox: self.sandbox,
            transmitted_at: parse_timestamp(&self.transmitted_at)?,
            discarded_at: parse_optional(self.discarded_at.as_deref())?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = packages)]
pub struct NewPackageRow {
    pub reference: String,
    pub origin: String,
    pub collectivity_id: i64,
    pub publisher_id: Option<i64>,
    pub ddfip_id: i64,
    pub sandbox: bool,
    pub transmitted_at: String,
}

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = communes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommuneRow {
    pub code_insee: String,
    pub name: String,
    pub code_departement: String,
    pub siren_epci: Option<String>,
}

impl From<CommuneRow> for Commune {
    fn from(row: CommuneRow) -> Self {
        Self {
            code_insee: row.code_insee,
            name: row.name,
            code_departement: row.code_departement,
            siren_epci: row.siren_epci,
        }
    }
}

impl From<&Commune> for CommuneRow {
    fn from(commune: &Commune) -> Self {
        Self {
            code_insee: commune.code_insee.clone(),
            name: commune.name.clone(),
            code_departement: commune.code_departement.clone(),
            siren_epci: commune.siren_epci.clone(),
        }
    }
}

/// Organizations share one table; columns unused by a kind stay NULL.
#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrganizationRow {
    pub organization_id: i64,
    pub kind: String,
    pub name: String,
    pub publisher_id: Option<i64>,
    pub territory_kind: Option<String>,
    pub territory_code: Option<String>,
    pub code_departement: Option<String>,
}

impl OrganizationRow {
    pub fn into_organization(self) -> Result<Organization, PersistenceError> {
        let missing = |column: &str| {
            PersistenceError::InvalidStoredValue(format!(
                "organization {} ({}) has no {column}",
                self.organization_id, self.kind
            ))
        };
        match self.kind.as_str() {
            "collectivity" => {
                let kind: &str = self
                    .territory_kind
                    .as_deref()
                    .ok_or_else(|| missing("territory_kind"))?;
                let code: String = self
                    .territory_code
                    .clone()
                    .ok_or_else(|| missing("territory_code"))?;
                Ok(Organization::Collectivity(Collectivity {
                    collectivity_id: self.organization_id,
                    name: self.name,
                    publisher_id: self.publisher_id,
                    territory: CollectivityTerritory::from_parts(kind, code)?,
                }))
            }
            "publisher" => Ok(Organization::Publisher(Publisher {
                publisher_id: self.organization_id,
                name: self.name,
            })),
            "ddfip" => {
                let code_departement: String = self
                    .code_departement
                    .clone()
                    .ok_or_else(|| missing("code_departement"))?;
                Ok(Organization::Ddfip(Ddfip {
                    ddfip_id: self.organization_id,
                    name: self.name,
                    code_departement,
                }))
            }
            "dgfip" => Ok(Organization::Dgfip(Dgfip {
                dgfip_id: self.organization_id,
                name: self.name,
            })),
            other => Err(PersistenceError::InvalidStoredValue(format!(
                "unknown organization kind '{other}'"
            ))),
        }
    }
}

impl From<&Organization> for OrganizationRow {
    fn from(organization: &Organization) -> Self {
        let mut row: Self = Self {
            organization_id: organization.id(),
            kind: organization.kind().as_str().to_string(),
            name: organization.name().to_string(),
            publisher_id: None,
            territory_kind: None,
            territory_code: None,
            code_departement: None,
        };
        match organization {
            Organization::Collectivity(collectivity) => {
                row.publisher_id = collectivity.publisher_id;
                row.territory_kind = Some(collectivity.territory.kind().to_string());
                row.territory_code = Some(collectivity.territory.code().to_string());
            }
            Organization::Ddfip(ddfip) => {
                row.code_departement = Some(ddfip.code_departement.clone());
            }
            Organization::Publisher(_) | Organization::Dgfip(_) => {}
        }
        row
    }
}
