//! User management endpoints.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserResponse};

/// Configure user routes.
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(deactivate_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

/// Create a user. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 401, description = "Not an admin", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[post("/users")]
pub async fn create_user(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = db::users::create_user(pool.connection(), &auth.actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List users visible to the caller.
///
/// Admins see everyone; other roles see only themselves.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = Vec<UserResponse>)
    ),
    security(("session_token" = []))
)]
#[get("/users")]
pub async fn list_users(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    query: web::Query<ListUsersQuery>,
) -> AppResult<HttpResponse> {
    let users = db::users::list_users(pool.connection(), &auth.actor, &query).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// Get a user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = db::users::get_user(pool.connection(), &auth.actor, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Update a user.
///
/// Users may edit their own profile; role changes are admin-only.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Role change without admin", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[patch("/users/{id}")]
pub async fn update_user(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = db::users::update_user(pool.connection(), &auth.actor, id, body.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Deactivate a user (soft delete). Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/deactivate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[post("/users/{id}/deactivate")]
pub async fn deactivate_user(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let affected = db::users::deactivate_user(pool.connection(), &auth.actor, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("User {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Hard-delete a user. Admin only; sessions cascade.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let affected = db::users::delete_user(pool.connection(), &auth.actor, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("User {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}
