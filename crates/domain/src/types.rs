// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Competence tag classifying the kind of anomaly a report describes.
///
/// Offices declare the form types they handle; form admins are scoped by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    /// Valuation of a dwelling.
    ValuationHabitation,
    /// Valuation of business premises.
    ValuationProfessional,
    /// Occupancy of a dwelling.
    OccupancyHabitation,
    /// Occupancy of business premises.
    OccupancyProfessional,
    /// Undeclared new dwelling.
    CreationHabitation,
    /// Undeclared new business premises.
    CreationProfessional,
}

impl FormType {
    /// Every form type of the catalogue.
    pub const ALL: [Self; 6] = [
        Self::ValuationHabitation,
        Self::ValuationProfessional,
        Self::OccupancyHabitation,
        Self::OccupancyProfessional,
        Self::CreationHabitation,
        Self::CreationProfessional,
    ];

    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValuationHabitation => "valuation_habitation",
            Self::ValuationProfessional => "valuation_professional",
            Self::OccupancyHabitation => "occupancy_habitation",
            Self::OccupancyProfessional => "occupancy_professional",
            Self::CreationHabitation => "creation_habitation",
            Self::CreationProfessional => "creation_professional",
        }
    }
}

impl FromStr for FormType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|form_type| form_type.as_str() == s)
            .ok_or_else(|| DomainError::InvalidFormType(s.to_string()))
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a report entered the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Created by a collectivity user through the web interface.
    WebUi,
    /// Created by a publisher through the API.
    Api,
}

impl Origin {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WebUi => "web_ui",
            Self::Api => "api",
        }
    }
}

impl FromStr for Origin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web_ui" => Ok(Self::WebUi),
            "api" => Ok(Self::Api),
            _ => Err(DomainError::InvalidOrigin(s.to_string())),
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handling priority requested by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

/// Outcome chosen by the DDFIP when resolving a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The anomaly is confirmed and will be corrected.
    Applicable,
    /// The anomaly is not confirmed.
    Inapplicable,
}

impl Resolution {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applicable => "applicable",
            Self::Inapplicable => "inapplicable",
        }
    }
}

impl FromStr for Resolution {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applicable" => Ok(Self::Applicable),
            "inapplicable" => Ok(Self::Inapplicable),
            _ => Err(DomainError::InvalidResolution(s.to_string())),
        }
    }
}
