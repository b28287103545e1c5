//! Actix-web extractor for session-token authentication.
//!
//! # Security
//! - Secret header values are wrapped in `SecretString` immediately
//! - Secret values are never logged or exposed in debug output
//! - The service key is compared in constant time

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use super::ServiceKey;
use crate::config::{SERVICE_KEY_HEADER, SESSION_TOKEN_HEADER};
use crate::db::{self, DbPool};
use crate::entity::user;
use crate::error::ErrorResponse;
use crate::policy::Actor;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for the extractor.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires an authenticated caller.
///
/// Two identities are accepted:
/// - a session token in `X-Session-Token`, resolved against `user_sessions`
/// - the service key in `X-Service-Key`, for the automation identity
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: AuthSession) -> impl Responder {
///     // auth.actor carries the caller's id and role
/// }
/// ```
pub struct AuthSession {
    pub actor: Actor,
    /// The authenticated user row. None for the service identity.
    pub user: Option<user::Model>,
    /// The cleartext session token, kept for logout. None for the service
    /// identity.
    pub token: Option<SecretString>,
}

impl FromRequest for AuthSession {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Session resolution hits the database, so everything the async block
        // needs is cloned out of the request up front.
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let stored_service_key = req.app_data::<web::Data<ServiceKey>>().cloned();

        let provided_token = extract_secret_header(req, SESSION_TOKEN_HEADER);
        let provided_service_key = extract_secret_header(req, SERVICE_KEY_HEADER);

        Box::pin(async move {
            // Service key first: constant-time comparison against the
            // configured key, no database round trip.
            if let Some(ref provided) = provided_service_key {
                if let Some(key) = stored_service_key
                    && key.verify(provided.expose_secret())
                {
                    return Ok(AuthSession {
                        actor: Actor::service(),
                        user: None,
                        token: None,
                    });
                }
                return Err(AuthError {
                    message: "Invalid service key".to_string(),
                });
            }

            let Some(token) = provided_token else {
                return Err(AuthError {
                    message: format!(
                        "Missing session token. Provide {} header.",
                        SESSION_TOKEN_HEADER
                    ),
                });
            };

            let Some(pool) = pool else {
                return Err(AuthError {
                    message: "Internal configuration error".to_string(),
                });
            };

            match db::sessions::resolve_token(pool.connection(), token.expose_secret()).await {
                Ok(Some((actor, user))) => Ok(AuthSession {
                    actor,
                    user: Some(user),
                    token: Some(token),
                }),
                Ok(None) => Err(AuthError {
                    message: "Invalid or expired session".to_string(),
                }),
                Err(e) => Err(AuthError {
                    message: e.to_string(),
                }),
            }
        })
    }
}
