//! Database operations for users.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entity::user::{self, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::user::{CreateUserRequest, ListUsersQuery, UpdateUserRequest};
use crate::policy::{self, Actor, Operation, Role, Scope};

use super::stamp;

/// Hash a password with SHA-256 (hex digest).
pub fn hash_password(password: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

/// Create a user. Admin only.
pub async fn create_user(
    db: &DatabaseConnection,
    actor: &Actor,
    req: CreateUserRequest,
) -> AppResult<user::Model> {
    if policy::users_scope(actor, Operation::Insert).is_denied() {
        return Err(AppError::Unauthorized(
            "Only admins may create users".to_string(),
        ));
    }

    if req.role == Role::Service {
        return Err(AppError::InvalidInput(
            "The service role cannot be assigned to a user".to_string(),
        ));
    }

    let now = Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(req.username),
        full_name: Set(req.full_name),
        role: Set(req.role.as_str().to_string()),
        site_location: Set(req.site_location),
        password_hash: Set(req.password.as_ref().map(hash_password)),
        email: Set(req.email),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(db).await?)
}

/// List users visible to the actor, optionally filtered by role and site.
pub async fn list_users(
    db: &DatabaseConnection,
    actor: &Actor,
    query: &ListUsersQuery,
) -> AppResult<Vec<user::Model>> {
    let mut select = User::find();

    match policy::users_scope(actor, Operation::Select) {
        Scope::All => {}
        Scope::Owned(id) => select = select.filter(user::Column::Id.eq(id)),
        Scope::Denied => return Ok(Vec::new()),
    }

    if let Some(role) = query.role {
        select = select.filter(user::Column::Role.eq(role.as_str()));
    }
    if let Some(ref site) = query.site {
        select = select.filter(user::Column::SiteLocation.eq(site.clone()));
    }

    Ok(select.order_by_asc(user::Column::Username).all(db).await?)
}

/// Get a user by id, policy-scoped.
pub async fn get_user(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
) -> AppResult<Option<user::Model>> {
    let mut select = User::find_by_id(id);

    match policy::users_scope(actor, Operation::Select) {
        Scope::All => {}
        Scope::Owned(own) => select = select.filter(user::Column::Id.eq(own)),
        Scope::Denied => return Ok(None),
    }

    Ok(select.one(db).await?)
}

/// Update a user. Role changes require admin regardless of ownership.
/// Returns None when the row is out of scope (silent denial).
pub async fn update_user(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    req: UpdateUserRequest,
) -> AppResult<Option<user::Model>> {
    if req.role.is_some() && !policy::may_change_role(actor) {
        return Err(AppError::Unauthorized(
            "Only admins may change a user's role".to_string(),
        ));
    }

    let scope = policy::users_scope(actor, Operation::Update);
    if !scope.permits_owner(id) {
        return Ok(None);
    }

    let Some(existing) = User::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let previous_updated_at = existing.updated_at;
    let mut active: user::ActiveModel = existing.into();
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(role) = req.role {
        if role == Role::Service {
            return Err(AppError::InvalidInput(
                "The service role cannot be assigned to a user".to_string(),
            ));
        }
        active.role = Set(role.as_str().to_string());
    }
    if let Some(site) = req.site_location {
        active.site_location = Set(Some(site));
    }
    if let Some(ref password) = req.password {
        active.password_hash = Set(Some(hash_password(password)));
    }
    if let Some(email) = req.email {
        active.email = Set(Some(email));
    }
    active.updated_at = Set(stamp::touch(previous_updated_at));

    Ok(Some(active.update(db).await?))
}

/// Deactivate a user (soft delete). Admin only; returns affected rows.
pub async fn deactivate_user(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> AppResult<u64> {
    if policy::users_scope(actor, Operation::Delete).is_denied() {
        return Ok(0);
    }

    let result = User::update_many()
        .col_expr(user::Column::IsActive, Expr::value(false))
        .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(user::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Hard-delete a user. Admin only; returns affected rows. Sessions cascade.
pub async fn delete_user(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> AppResult<u64> {
    if policy::users_scope(actor, Operation::Delete).is_denied() {
        return Ok(0);
    }

    let result = User::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

// Pre-authentication lookups used by the login flows. These run before an
// actor exists and therefore take no policy scope; they only ever surface
// active users.

/// Find an active user by username and role (password login flow).
pub async fn find_for_password_login(
    db: &DatabaseConnection,
    username: &str,
) -> AppResult<Option<user::Model>> {
    let result = User::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::IsActive.eq(true))
        .filter(
            user::Column::Role
                .eq(Role::ProjectManager.as_str())
                .or(user::Column::Role.eq(Role::Admin.as_str())),
        )
        .one(db)
        .await?;

    Ok(result)
}

/// Find an active engineer by full name and site code (passwordless flow).
pub async fn find_engineer_by_name_and_site(
    db: &DatabaseConnection,
    full_name: &str,
    site_code: &str,
) -> AppResult<Option<user::Model>> {
    let result = User::find()
        .filter(user::Column::FullName.eq(full_name))
        .filter(user::Column::SiteLocation.eq(site_code))
        .filter(user::Column::Role.eq(Role::Engineer.as_str()))
        .filter(user::Column::IsActive.eq(true))
        .one(db)
        .await?;

    Ok(result)
}

/// Record a successful login.
pub async fn update_last_login(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    User::update_many()
        .col_expr(user::Column::LastLogin, Expr::value(Some(Utc::now())))
        .filter(user::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let hash = hash_password(&SecretString::from("secret".to_string()));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic
        assert_eq!(hash, hash_password(&SecretString::from("secret".to_string())));
        assert_ne!(hash, hash_password(&SecretString::from("other".to_string())));
    }
}
