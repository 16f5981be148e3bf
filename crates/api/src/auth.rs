//! Caller extraction from request headers.
//!
//! Authentication itself happens upstream (gateway/session layer); this
//! extractor trusts the identity headers it forwards and turns them into
//! an explicit [`Caller`] so the core never re-derives roles ad hoc.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::UserId;
use domain::{Caller, Role};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated user's UUID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role (`customer` or `admin`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("malformed {name} header")))
}

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id_str = header_value(parts, USER_ID_HEADER)?;
        let user_id = Uuid::parse_str(id_str)
            .map(UserId::from_uuid)
            .map_err(|e| ApiError::Unauthorized(format!("invalid {USER_ID_HEADER}: {e}")))?;

        let role_str = header_value(parts, USER_ROLE_HEADER)?;
        let role = Role::parse(role_str).ok_or_else(|| {
            ApiError::Unauthorized(format!("unknown {USER_ROLE_HEADER}: {role_str}"))
        })?;

        Ok(AuthenticatedCaller(Caller { user_id, role }))
    }
}

/// Extractor wrapper around the domain [`Caller`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCaller(pub Caller);
