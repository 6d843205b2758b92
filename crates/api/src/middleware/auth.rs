//! API-key and bearer-session extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mechgraph_core::error::CoreError;
use mechgraph_store::{Session, StoreClient};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the public API key.
pub const API_KEY_HEADER: &str = "apikey";

/// Proof that the request presented the configured public API key.
///
/// ```ignore
/// async fn public_page(_key: ApiKey) -> Json<()> {
///     Json(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        match presented {
            Some(key) if key == state.config.store.api_key => Ok(ApiKey),
            Some(_) => Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            ))),
            None => Err(AppError::Core(CoreError::Unauthorized(
                "Missing apikey header".into(),
            ))),
        }
    }
}

/// The caller of a store-backed route: API key checked, session optional.
///
/// A request without an `Authorization` header is anonymous. A header that
/// is present but not a valid `Bearer` token is rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub session: Option<Session>,
}

impl Caller {
    /// A store client acting as this caller.
    pub fn client(&self, state: &AppState) -> StoreClient {
        state.client(self.session)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        ApiKey::from_request_parts(parts, state).await?;

        let Some(auth_header) = parts.headers.get("authorization") else {
            return Ok(Caller { session: None });
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(Caller {
            session: Some(Session::new(claims.sub)),
        })
    }
}
