// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction at the server boundary.
//!
//! Identity is asserted by the caller through the `x-user-id` header and
//! resolved against stored users. An optional `x-request-id` header becomes
//! the audit cause id.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use signalements_api::{AuthenticatedActor, AuthenticationService};
use signalements_audit::Cause;
use tracing::{debug, warn};

use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extractor for the acting user and the cause of the request.
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - The `x-user-id` header is missing
/// - The header is not a number
/// - No user has that id
pub struct SessionActor(pub AuthenticatedActor, pub Cause);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing x-user-id header");
                SessionError::MissingUserHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid x-user-id header encoding");
                SessionError::InvalidUserHeader
            })?;

        let user_id: i64 = header.trim().parse().map_err(|_| {
            warn!(header, "x-user-id header is not a user id");
            SessionError::InvalidUserHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor = AuthenticationService::authenticate(&mut persistence, user_id)
            .map_err(|e| {
                warn!(user_id, error = %e, "Authentication failed");
                SessionError::UnknownUser(e.to_string())
            })?;

        let request_id: String = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map_or_else(|| format!("user-{user_id}"), str::to_string);
        let cause: Cause = Cause::new(
            request_id,
            format!("{} {}", parts.method, parts.uri.path()),
        );

        Ok(Self(actor, cause))
    }
}

/// Actor extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingUserHeader,
    InvalidUserHeader,
    UnknownUser(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingUserHeader => String::from("Missing x-user-id header"),
            Self::InvalidUserHeader => {
                String::from("Invalid x-user-id header. Expected a numeric user id")
            }
            Self::UnknownUser(reason) => format!("Authentication failed: {reason}"),
        };

        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
