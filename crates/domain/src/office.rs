// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::territory::Commune;
use crate::types::FormType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A DDFIP sub-unit handling reports for a set of form types over a territory.
///
/// The territory is stored as it is assigned: communes directly, whole EPCIs,
/// or whole departements. Coverage of a commune is the union of the three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub office_id: i64,
    pub ddfip_id: i64,
    pub name: String,
    #[serde(default)]
    pub competences: BTreeSet<FormType>,
    /// INSEE codes of directly assigned communes.
    #[serde(default)]
    pub communes: BTreeSet<String>,
    /// SIRENs of assigned EPCIs.
    #[serde(default)]
    pub epcis: BTreeSet<String>,
    /// Codes of assigned departements.
    #[serde(default)]
    pub departements: BTreeSet<String>,
    #[serde(default)]
    pub member_ids: BTreeSet<i64>,
}

impl Office {
    /// Returns true if the office lists `form_type` among its competences.
    #[must_use]
    pub fn handles(&self, form_type: FormType) -> bool {
        self.competences.contains(&form_type)
    }

    /// Returns true if the commune falls inside the office territory.
    #[must_use]
    pub fn covers(&self, commune: &Commune) -> bool {
        self.communes.contains(&commune.code_insee)
            || commune
                .siren_epci
                .as_ref()
                .is_some_and(|siren| self.epcis.contains(siren))
            || self.departements.contains(&commune.code_departement)
    }

    #[must_use]
    pub fn has_member(&self, user_id: i64) -> bool {
        self.member_ids.contains(&user_id)
    }
}
