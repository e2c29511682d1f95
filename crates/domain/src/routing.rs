// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Office routing.
//!
//! Assignment never picks an office on its own: a DDFIP admin names the
//! target office and routing validates it. An office is eligible for a report
//! when it belongs to the report's DDFIP, lists the report's form type among
//! its competences and covers the report's commune.

use crate::error::DomainError;
use crate::office::Office;
use crate::organization::User;
use crate::report::Report;
use crate::territory::{Commune, Territory};
use crate::types::FormType;
use serde::{Deserialize, Serialize};

/// Why an office cannot handle a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RoutingMismatch {
    /// The office belongs to another DDFIP.
    WrongDdfip { expected: i64, actual: i64 },
    /// The office does not handle the report's form type.
    MissingCompetence { form_type: FormType },
    /// The report's commune is outside the office territory.
    OutsideTerritory { commune: String },
}

impl std::fmt::Display for RoutingMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongDdfip { expected, actual } => {
                write!(f, "office belongs to DDFIP {actual}, report belongs to DDFIP {expected}")
            }
            Self::MissingCompetence { form_type } => {
                write!(f, "office is not competent for '{form_type}'")
            }
            Self::OutsideTerritory { commune } => {
                write!(f, "commune '{commune}' is outside the office territory")
            }
        }
    }
}

/// Checks the three routing conditions for an already resolved commune.
fn match_office(
    office: &Office,
    ddfip_id: i64,
    form_type: FormType,
    commune: &Commune,
) -> Result<(), RoutingMismatch> {
    if office.ddfip_id != ddfip_id {
        return Err(RoutingMismatch::WrongDdfip {
            expected: ddfip_id,
            actual: office.ddfip_id,
        });
    }
    if !office.handles(form_type) {
        return Err(RoutingMismatch::MissingCompetence { form_type });
    }
    if !office.covers(commune) {
        return Err(RoutingMismatch::OutsideTerritory {
            commune: commune.code_insee.clone(),
        });
    }
    Ok(())
}

/// Validates that `office` may be assigned `report`.
///
/// # Errors
///
/// Returns `DomainError::RoutingMismatch` naming the first failing condition,
/// or a lookup error if the report's commune cannot be resolved.
pub fn check_office_eligibility(
    report: &Report,
    office: &Office,
    territory: &Territory,
) -> Result<(), DomainError> {
    let ddfip_id: i64 = report.ddfip(territory)?;
    let commune: &Commune = territory
        .commune(&report.commune)
        .ok_or_else(|| DomainError::UnknownCommune(report.commune.clone()))?;

    match_office(office, ddfip_id, report.form_type, commune).map_err(|reason| {
        DomainError::RoutingMismatch {
            office_id: office.office_id,
            reason,
        }
    })
}

/// Returns the offices eligible for `report`, preserving input order.
///
/// A report whose commune cannot be resolved has no candidates.
#[must_use]
pub fn route_candidates<'a>(
    report: &Report,
    offices: &'a [Office],
    territory: &Territory,
) -> Vec<&'a Office> {
    let Ok(ddfip_id) = report.ddfip(territory) else {
        return Vec::new();
    };
    let Some(commune) = territory.commune(&report.commune) else {
        return Vec::new();
    };

    offices
        .iter()
        .filter(|office| match_office(office, ddfip_id, report.form_type, commune).is_ok())
        .collect()
}

/// Returns true if `user` belongs to the office the report is assigned to.
#[must_use]
pub fn is_assigned_office_member(user: &User, report: &Report) -> bool {
    report
        .office_id
        .is_some_and(|office_id| user.is_member_of(office_id))
}
