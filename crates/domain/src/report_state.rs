// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report lifecycle states and the transition table.
//!
//! A report moves from creation by a collectivity (or a publisher) through
//! transmission to a DDFIP, then through triage, assignment to an office,
//! resolution and final confirmation. Re-entering the current state is legal
//! so that confirmations can be repeated.

use crate::error::DomainError;
use crate::types::Resolution;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a report, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    /// Being written by its creator.
    Draft,
    /// Complete and waiting to be transmitted.
    Ready,
    /// Delivered to the DDFIP inside a package.
    Transmitted,
    /// Acknowledged by the DDFIP.
    Accepted,
    /// Routed to an office.
    Assigned,
    /// Resolved as applicable, awaiting confirmation.
    Applicable,
    /// Resolved as inapplicable, awaiting confirmation.
    Inapplicable,
    /// Applicable resolution confirmed.
    Approved,
    /// Inapplicable resolution confirmed.
    Canceled,
    /// Refused by the DDFIP.
    Rejected,
}

/// States visible to the DDFIP and the DGFIP.
pub const TRANSMITTED_ONWARD: [ReportState; 8] = [
    ReportState::Transmitted,
    ReportState::Accepted,
    ReportState::Assigned,
    ReportState::Applicable,
    ReportState::Inapplicable,
    ReportState::Approved,
    ReportState::Canceled,
    ReportState::Rejected,
];

/// States visible to office members.
pub const ASSIGNED_ONWARD: [ReportState; 5] = [
    ReportState::Assigned,
    ReportState::Applicable,
    ReportState::Inapplicable,
    ReportState::Approved,
    ReportState::Canceled,
];

impl ReportState {
    /// Every state, in workflow order.
    pub const ALL: [Self; 10] = [
        Self::Draft,
        Self::Ready,
        Self::Transmitted,
        Self::Accepted,
        Self::Assigned,
        Self::Applicable,
        Self::Inapplicable,
        Self::Approved,
        Self::Canceled,
        Self::Rejected,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Transmitted => "transmitted",
            Self::Accepted => "accepted",
            Self::Assigned => "assigned",
            Self::Applicable => "applicable",
            Self::Inapplicable => "inapplicable",
            Self::Approved => "approved",
            Self::Canceled => "canceled",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once the report has left its creator.
    #[must_use]
    pub const fn is_transmitted(&self) -> bool {
        !matches!(self, Self::Draft | Self::Ready)
    }

    /// Returns true once the report has been routed to an office.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(
            self,
            Self::Assigned | Self::Applicable | Self::Inapplicable | Self::Approved | Self::Canceled
        )
    }

    /// Returns true while the creator may still edit or discard the report.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Ready)
    }

    /// Returns true if no further workflow event can leave this state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Canceled | Self::Rejected)
    }
}

impl FromStr for ReportState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| DomainError::InvalidReportState(s.to_string()))
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow events that move a report between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportEvent {
    MarkReady,
    Transmit,
    Accept,
    Assign,
    Resolve(Resolution),
    Confirm,
    Reject,
}

impl ReportEvent {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MarkReady => "mark_ready",
            Self::Transmit => "transmit",
            Self::Accept => "accept",
            Self::Assign => "assign",
            Self::Resolve(_) => "resolve",
            Self::Confirm => "confirm",
            Self::Reject => "reject",
        }
    }

    /// States from which this event may fire.
    #[must_use]
    pub const fn sources(&self) -> &'static [ReportState] {
        match self {
            Self::MarkReady => &[ReportState::Draft, ReportState::Ready],
            Self::Transmit => &[ReportState::Ready],
            Self::Accept => &[ReportState::Transmitted, ReportState::Accepted],
            Self::Assign => &[ReportState::Accepted, ReportState::Assigned],
            Self::Resolve(_) => &[
                ReportState::Assigned,
                ReportState::Applicable,
                ReportState::Inapplicable,
            ],
            Self::Confirm => &[
                ReportState::Applicable,
                ReportState::Inapplicable,
                ReportState::Approved,
                ReportState::Canceled,
            ],
            Self::Reject => &[
                ReportState::Transmitted,
                ReportState::Accepted,
                ReportState::Rejected,
            ],
        }
    }

    /// Returns true if the event may fire from `state`.
    #[must_use]
    pub fn is_allowed_from(&self, state: ReportState) -> bool {
        self.sources().contains(&state)
    }

    /// Computes the state reached by firing this event from `from`.
    ///
    /// Confirmation keeps the direction of the resolution: an applicable
    /// report is approved, an inapplicable one is canceled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the event may not fire
    /// from `from`.
    pub fn target(&self, from: ReportState) -> Result<ReportState, DomainError> {
        if !self.is_allowed_from(from) {
            return Err(DomainError::InvalidTransition { from, event: *self });
        }

        let to = match self {
            Self::MarkReady => ReportState::Ready,
            Self::Transmit => ReportState::Transmitted,
            Self::Accept => ReportState::Accepted,
            Self::Assign => ReportState::Assigned,
            Self::Resolve(Resolution::Applicable) => ReportState::Applicable,
            Self::Resolve(Resolution::Inapplicable) => ReportState::Inapplicable,
            Self::Confirm => match from {
                ReportState::Applicable | ReportState::Approved => ReportState::Approved,
                _ => ReportState::Canceled,
            },
            Self::Reject => ReportState::Rejected,
        };
        Ok(to)
    }
}
