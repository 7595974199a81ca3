// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller extraction for the server.
//!
//! The identity provider authenticates callers upstream and forwards the
//! opaque principal as `Authorization: Bearer <principal>`. A missing header
//! means the caller is a guest.
//!
//! Request bodies go through [`HttpJson`] so malformed input is answered
//! with the same JSON error body as every other rejected request.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use fleetdesk_api::AuthenticatedActor;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for the resolved caller of a request.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     Caller(actor): Caller,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the Authorization header is present but
/// is not a `Bearer` credential, and HTTP 400 if the principal is malformed.
pub struct Caller(pub AuthenticatedActor);

impl FromRequestParts<AppState> for Caller {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal: Option<&str> = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => {
                let header: &str = value.to_str().map_err(|_| {
                    warn!("Invalid Authorization header encoding");
                    SessionError::InvalidAuthorizationHeader
                })?;
                let principal: &str = header.strip_prefix("Bearer ").ok_or_else(|| {
                    warn!("Authorization header does not start with 'Bearer '");
                    SessionError::InvalidAuthorizationHeader
                })?;
                Some(principal)
            }
        };

        let mut desk = state.desk.lock().await;
        let actor: AuthenticatedActor = desk
            .resolve_caller(principal)
            .map_err(|e| SessionError::Rejected(HttpError::from(e)))?;

        debug!(
            principal = ?actor.principal.as_ref().map(fleetdesk_domain::Principal::as_str),
            role = %actor.role,
            "Caller resolved"
        );

        Ok(Self(actor))
    }
}

/// Caller extraction errors.
pub enum SessionError {
    /// Authorization header is not a `Bearer` credential.
    InvalidAuthorizationHeader,
    /// The principal was rejected or the role lookup failed.
    Rejected(HttpError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidAuthorizationHeader => HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: String::from(
                    "Invalid Authorization header format. Expected: 'Bearer <principal>'",
                ),
            }
            .into_response(),
            Self::Rejected(err) => err.into_response(),
        }
    }
}

/// JSON body extractor whose rejection is an [`HttpError`].
///
/// An unknown enum value, an out-of-range number or broken syntax yields
/// 400 with the deserializer's message instead of axum's plain-text 422.
pub struct HttpJson<T>(pub T);

impl<T, S> FromRequest<S> for HttpJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        let status: StatusCode = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        warn!(status = %status, reason = %rejection.body_text(), "Rejected request body");
        Self {
            status,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}
