// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commune index used to resolve a report's departement and DDFIP.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A commune and the keys linking it to the territorial hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commune {
    /// INSEE code.
    pub code_insee: String,
    pub name: String,
    pub code_departement: String,
    /// SIREN of the EPCI the commune belongs to, if any.
    pub siren_epci: Option<String>,
}

/// Read-only lookup of communes and the DDFIP serving each departement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Territory {
    communes: BTreeMap<String, Commune>,
    ddfips_by_departement: BTreeMap<String, i64>,
}

impl Territory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a commune, replacing any previous entry with the same code.
    pub fn add_commune(&mut self, commune: Commune) {
        self.communes.insert(commune.code_insee.clone(), commune);
    }

    /// Registers the DDFIP serving a departement.
    pub fn add_ddfip(&mut self, code_departement: &str, ddfip_id: i64) {
        self.ddfips_by_departement
            .insert(code_departement.to_string(), ddfip_id);
    }

    #[must_use]
    pub fn commune(&self, code_insee: &str) -> Option<&Commune> {
        self.communes.get(code_insee)
    }

    /// Resolves a commune to the DDFIP of its departement.
    ///
    /// # Errors
    ///
    /// Returns an error if the commune is unknown or its departement has no DDFIP.
    pub fn ddfip_for_commune(&self, code_insee: &str) -> Result<i64, DomainError> {
        let commune: &Commune = self
            .commune(code_insee)
            .ok_or_else(|| DomainError::UnknownCommune(code_insee.to_string()))?;
        self.ddfips_by_departement
            .get(&commune.code_departement)
            .copied()
            .ok_or_else(|| DomainError::DdfipNotFound {
                code_departement: commune.code_departement.clone(),
            })
    }

    #[must_use]
    pub fn commune_count(&self) -> usize {
        self.communes.len()
    }
}
