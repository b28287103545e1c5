//! Authentication endpoints: login, logout, whoami.

use actix_web::{HttpResponse, get, post, web};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::auth::AuthSession;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse, UserResponse};

/// Configure auth routes.
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(me);
}

/// Log in and open a session.
///
/// Two request shapes are accepted:
/// - `{"username", "password"}` for project managers and admins
/// - `{"full_name", "site_code"}` for the passwordless site-engineer flow
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let conn = pool.connection();

    let user = match body.into_inner() {
        LoginRequest::Credentials { username, password } => {
            let Some(user) = db::users::find_for_password_login(conn, &username).await? else {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            };

            // Constant-time hash comparison; missing hash means the account
            // was provisioned without a password and cannot use this flow.
            let computed = db::users::hash_password(&password);
            let matches = user
                .password_hash
                .as_deref()
                .is_some_and(|stored| stored.as_bytes().ct_eq(computed.as_bytes()).into());
            drop(password);

            if !matches {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
            user
        }
        LoginRequest::Engineer {
            full_name,
            site_code,
        } => {
            let Some(user) =
                db::users::find_engineer_by_name_and_site(conn, full_name.trim(), site_code.trim())
                    .await?
            else {
                return Err(AppError::Unauthorized(
                    "No active engineer matches that name and site".to_string(),
                ));
            };
            user
        }
    };

    db::users::update_last_login(conn, user.id).await?;
    let (token, session) = db::sessions::create_session(conn, user.id).await?;

    tracing::info!(user = %user.username, role = %user.role, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        expires_at: session.expires_at,
        user: user.into(),
    }))
}

/// Close the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[post("/auth/logout")]
pub async fn logout(pool: web::Data<DbPool>, auth: AuthSession) -> AppResult<HttpResponse> {
    if let Some(ref token) = auth.token {
        db::sessions::deactivate_by_token(pool.connection(), token.expose_secret()).await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Return the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[get("/auth/me")]
pub async fn me(auth: AuthSession) -> AppResult<HttpResponse> {
    let Some(user) = auth.user else {
        // The service identity has no user row.
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "role": "service"
        })));
    };
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
