// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::FormType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Territory a collectivity administers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum CollectivityTerritory {
    /// A commune, by INSEE code.
    Commune(String),
    /// An EPCI, by SIREN.
    Epci(String),
    /// A departement, by code.
    Departement(String),
    /// A region, by code.
    Region(String),
}

impl CollectivityTerritory {
    /// Returns the kind tag used for persistence.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Commune(_) => "commune",
            Self::Epci(_) => "epci",
            Self::Departement(_) => "departement",
            Self::Region(_) => "region",
        }
    }

    /// Returns the territory code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Commune(code)
            | Self::Epci(code)
            | Self::Departement(code)
            | Self::Region(code) => code,
        }
    }

    /// Rebuilds a territory from its persisted kind and code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTerritoryKind` for an unknown kind.
    pub fn from_parts(kind: &str, code: String) -> Result<Self, DomainError> {
        match kind {
            "commune" => Ok(Self::Commune(code)),
            "epci" => Ok(Self::Epci(code)),
            "departement" => Ok(Self::Departement(code)),
            "region" => Ok(Self::Region(code)),
            _ => Err(DomainError::InvalidTerritoryKind(kind.to_string())),
        }
    }
}

/// A local-government body reporting anomalies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectivity {
    pub collectivity_id: i64,
    pub name: String,
    /// The software publisher transmitting on its behalf, if any.
    pub publisher_id: Option<i64>,
    pub territory: CollectivityTerritory,
}

/// A software publisher transmitting reports through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub publisher_id: i64,
    pub name: String,
}

/// A departmental tax administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ddfip {
    pub ddfip_id: i64,
    pub name: String,
    pub code_departement: String,
}

/// The national oversight organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dgfip {
    pub dgfip_id: i64,
    pub name: String,
}

/// Discriminant of [`Organization`], used for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    Collectivity,
    Publisher,
    Ddfip,
    Dgfip,
}

impl OrganizationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Collectivity => "collectivity",
            Self::Publisher => "publisher",
            Self::Ddfip => "ddfip",
            Self::Dgfip => "dgfip",
        }
    }
}

impl FromStr for OrganizationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collectivity" => Ok(Self::Collectivity),
            "publisher" => Ok(Self::Publisher),
            "ddfip" => Ok(Self::Ddfip),
            "dgfip" => Ok(Self::Dgfip),
            _ => Err(DomainError::InvalidOrganizationKind(s.to_string())),
        }
    }
}

/// The organization a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Organization {
    Collectivity(Collectivity),
    Publisher(Publisher),
    Ddfip(Ddfip),
    Dgfip(Dgfip),
}

impl Organization {
    /// Returns the organization identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Collectivity(c) => c.collectivity_id,
            Self::Publisher(p) => p.publisher_id,
            Self::Ddfip(d) => d.ddfip_id,
            Self::Dgfip(d) => d.dgfip_id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> OrganizationKind {
        match self {
            Self::Collectivity(_) => OrganizationKind::Collectivity,
            Self::Publisher(_) => OrganizationKind::Publisher,
            Self::Ddfip(_) => OrganizationKind::Ddfip,
            Self::Dgfip(_) => OrganizationKind::Dgfip,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Collectivity(c) => &c.name,
            Self::Publisher(p) => &p.name,
            Self::Ddfip(d) => &d.name,
            Self::Dgfip(d) => &d.name,
        }
    }
}

/// A person acting on behalf of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub email: String,
    /// Administrator of their own organization.
    #[serde(default)]
    pub organization_admin: bool,
    /// Platform-wide administrator.
    #[serde(default)]
    pub super_admin: bool,
    /// Form types this DDFIP user administers. Empty for everyone else.
    #[serde(default)]
    pub form_admin_types: BTreeSet<FormType>,
    /// Offices this user is a member of.
    #[serde(default)]
    pub office_ids: BTreeSet<i64>,
}

impl User {
    /// Returns true if the user administers at least one form type.
    #[must_use]
    pub fn is_form_admin(&self) -> bool {
        !self.form_admin_types.is_empty()
    }

    /// Returns true if the user belongs to `office_id`.
    #[must_use]
    pub fn is_member_of(&self, office_id: i64) -> bool {
        self.office_ids.contains(&office_id)
    }
}
