// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON reference data: communes, organizations, users and offices.
//!
//! ```json
//! {
//!   "communes": [{ "code_insee": "64102", "name": "Bayonne", "code_departement": "64" }],
//!   "organizations": [{ "kind": "ddfip", "ddfip_id": 10, "name": "DDFIP 64", "code_departement": "64" }],
//!   "users": [{ "user_id": 1, "organization_id": 10, "name": "A", "email": "a@example.org" }],
//!   "offices": [{ "office_id": 1, "ddfip_id": 10, "name": "SIP", "member_ids": [1] }]
//! }
//! ```
//!
//! Office membership is read from `offices[].member_ids`; `users[].office_ids`
//! is ignored on load.

use std::path::Path;

use serde::Deserialize;
use signalements_domain::{Commune, Office, Organization, User};
use thiserror::Error;

use crate::error::PersistenceError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Cannot read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Cannot store seed data: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub communes: Vec<Commune>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub offices: Vec<Office>,
}

impl Seed {
    /// Parses seed data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the JSON does not describe seed data.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let path: &Path = path.as_ref();
        let json: String = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Returns organizations ordered so that publishers precede the
    /// collectivities referencing them.
    pub(crate) fn organizations_in_insert_order(&self) -> Vec<&Organization> {
        let mut ordered: Vec<&Organization> = self.organizations.iter().collect();
        ordered.sort_by_key(|org| matches!(org, Organization::Collectivity(_)));
        ordered
    }
}

/// Row counts written by a seed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub communes: usize,
    pub organizations: usize,
    pub users: usize,
    pub offices: usize,
}
