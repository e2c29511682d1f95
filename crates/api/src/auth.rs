// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authenticated actors.
//!
//! Credentials and sessions are handled upstream; by the time a request
//! reaches this crate it names a user id. The actor pairs that user with
//! its organization, which is all the policy engine looks at.

use signalements_audit::Actor;
use signalements_domain::{FormType, Organization, User};
use signalements_persistence::{Persistence, PersistenceError};
use tracing::debug;

use crate::error::ApiError;

/// A user acting for their organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub user: User,
    pub organization: Organization,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(user: User, organization: Organization) -> Self {
        Self { user, organization }
    }

    /// Converts this actor into the actor recorded in audit events.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(self.user.user_id, self.organization.id())
    }

    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        self.user.super_admin
    }

    /// Returns the DDFIP the actor works for, if any.
    #[must_use]
    pub const fn ddfip_id(&self) -> Option<i64> {
        match &self.organization {
            Organization::Ddfip(ddfip) => Some(ddfip.ddfip_id),
            _ => None,
        }
    }

    /// Returns true if the actor administers every form type of `ddfip_id`.
    #[must_use]
    pub fn is_ddfip_admin_of(&self, ddfip_id: i64) -> bool {
        self.ddfip_id() == Some(ddfip_id) && self.user.organization_admin
    }

    /// Returns true if the actor may administer `form_type` reports of
    /// `ddfip_id`, either as organization admin or as form admin.
    #[must_use]
    pub fn administers(&self, ddfip_id: i64, form_type: FormType) -> bool {
        self.is_ddfip_admin_of(ddfip_id)
            || (self.ddfip_id() == Some(ddfip_id)
                && self.user.form_admin_types.contains(&form_type))
    }

    /// Returns true if the actor is a DDFIP form admin without organization
    /// admin rights.
    #[must_use]
    pub fn is_restricted_form_admin(&self) -> bool {
        self.ddfip_id().is_some() && !self.user.organization_admin && self.user.is_form_admin()
    }
}

/// Resolves user ids into actors.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Loads the user and its organization.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the user does not exist,
    /// or an internal error if the organization cannot be loaded.
    pub fn authenticate(
        persistence: &mut Persistence,
        user_id: i64,
    ) -> Result<AuthenticatedActor, ApiError> {
        let user: User = persistence.get_user(user_id).map_err(|e| match e {
            PersistenceError::UserNotFound(_) => ApiError::AuthenticationFailed {
                reason: format!("Unknown user {user_id}"),
            },
            other => ApiError::Internal {
                message: format!("Failed to load user: {other}"),
            },
        })?;
        let organization: Organization = persistence
            .get_organization(user.organization_id)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to load organization of user {user_id}: {e}"),
            })?;

        debug!(
            user_id,
            organization_id = organization.id(),
            kind = organization.kind().as_str(),
            "Authenticated actor"
        );
        Ok(AuthenticatedActor::new(user, organization))
    }
}
