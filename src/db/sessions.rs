//! Database operations for user sessions.
//!
//! Tokens are opaque: 32 random bytes, hex-encoded, prefixed for
//! identification in logs. Only the SHA-256 digest is stored.

use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entity::user::{self, Entity as User};
use crate::entity::user_session::{self, Entity as Session};
use crate::error::AppResult;
use crate::policy::{Actor, Role};

use super::stamp;

/// Session token prefix (identifies token kind in request logs).
const TOKEN_PREFIX: &str = "dpr_st_";

/// Session lifetime.
const SESSION_HOURS: i64 = 24;

/// Generate a random session token string.
fn generate_token() -> String {
    let random_bytes: [u8; 32] = rand::random();
    format!("{}{}", TOKEN_PREFIX, hex::encode(random_bytes))
}

/// Hash a token for storage.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create a session for a user who just authenticated. Returns the cleartext
/// token (shown to the client once) and the stored row.
pub async fn create_session(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> AppResult<(String, user_session::Model)> {
    let token = generate_token();
    let now = Utc::now();

    let model = user_session::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token: Set(hash_token(&token)),
        active: Set(true),
        expires_at: Set(now + Duration::hours(SESSION_HOURS)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let stored = model.insert(db).await?;
    Ok((token, stored))
}

/// Resolve a session token to its actor and user row. Returns None for
/// unknown, inactive, or expired tokens, or when the user is deactivated.
pub async fn resolve_token(
    db: &DatabaseConnection,
    token: &str,
) -> AppResult<Option<(Actor, user::Model)>> {
    let hashed = hash_token(token);

    let Some(session) = Session::find()
        .filter(user_session::Column::Token.eq(hashed))
        .filter(user_session::Column::Active.eq(true))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if session.expires_at < Utc::now() {
        return Ok(None);
    }

    let Some(user) = User::find_by_id(session.user_id)
        .filter(user::Column::IsActive.eq(true))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let Some(role) = Role::parse(&user.role) else {
        return Ok(None);
    };

    Ok(Some((Actor::new(user.id, role), user)))
}

/// Deactivate the session behind a token (logout). The token itself proves
/// ownership; only the session's owner ever holds it.
pub async fn deactivate_by_token(db: &DatabaseConnection, token: &str) -> AppResult<u64> {
    let hashed = hash_token(token);

    let result = Session::update_many()
        .col_expr(user_session::Column::Active, Expr::value(false))
        .col_expr(
            user_session::Column::UpdatedAt,
            Expr::value(stamp::touch(Utc::now())),
        )
        .filter(user_session::Column::Token.eq(hashed))
        .filter(user_session::Column::Active.eq(true))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_prefixed() {
        let a = generate_token();
        let b = generate_token();
        assert!(a.starts_with(TOKEN_PREFIX));
        assert_ne!(a, b);
        // 32 bytes hex-encoded after the prefix
        assert_eq!(a.len(), TOKEN_PREFIX.len() + 64);
    }

    #[test]
    fn test_hash_token_deterministic() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }
}
