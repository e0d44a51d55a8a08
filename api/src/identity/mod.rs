use axum::http::StatusCode;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Deserialize;

use crate::{
    error::{ApiRequestError, AppError},
    models::user::{Author, NewUser},
    schema::users,
};

pub mod password;
pub mod routes;

/// The shared identity of every caller that doesn't name a registered user.
pub const ANONYMOUS: &str = "Anonymous";

// Not a PHC string, so password verification against it always fails.
const UNUSABLE_PASSWORD_HASH: &str = "!";

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("Username already taken")]
    UsernameTaken,

    #[error("The name `{ANONYMOUS}` belongs to everyone and cannot be registered")]
    ReservedUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,
}

impl ApiRequestError for IdentityError {
    fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::UsernameTaken => StatusCode::CONFLICT,
            IdentityError::ReservedUsername | IdentityError::UserNotFound => {
                StatusCode::BAD_REQUEST
            }
            IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        AppError::request(&e)
    }
}

/// What a mutating endpoint does when the acting username is not registered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnknownUser {
    ActAsAnonymous,
    Reject,
}

/// Blank or missing usernames act as [`ANONYMOUS`].
pub fn acting_username(username: Option<&str>) -> &str {
    match username.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => ANONYMOUS,
    }
}

pub async fn find_author(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> QueryResult<Option<Author>> {
    users::table
        .filter(users::username.eq(username))
        .select(Author::as_select())
        .first(conn)
        .await
        .optional()
}

/// Returns the anonymous user, creating it on first use.
pub async fn anonymous_author(conn: &mut AsyncPgConnection) -> QueryResult<Author> {
    diesel::insert_into(users::table)
        .values(&NewUser {
            username: ANONYMOUS.into(),
            password_hash: UNUSABLE_PASSWORD_HASH.into(),
            created_at: chrono::Utc::now().naive_utc(),
        })
        .on_conflict(users::username)
        .do_nothing()
        .execute(conn)
        .await?;

    users::table
        .filter(users::username.eq(ANONYMOUS))
        .select(Author::as_select())
        .first(conn)
        .await
}

/// Resolves the user a mutating request acts as.
pub async fn resolve_actor(
    conn: &mut AsyncPgConnection,
    username: Option<&str>,
    unknown: UnknownUser,
) -> Result<Author, AppError> {
    let username = acting_username(username);

    if username == ANONYMOUS {
        return Ok(anonymous_author(conn).await?);
    }

    if let Some(author) = find_author(conn, username).await? {
        return Ok(author);
    }

    match unknown {
        UnknownUser::ActAsAnonymous => {
            tracing::debug!(username, "unknown user, acting as anonymous");
            Ok(anonymous_author(conn).await?)
        }
        UnknownUser::Reject => Err(IdentityError::UserNotFound.into()),
    }
}

/// Body of the requests that only name who is acting, e.g. deletions.
#[derive(Deserialize, Debug)]
pub struct ActingUser {
    pub username: String,
}

/// Edits and deletions must name the acting user explicitly.
pub fn required_username(username: &str) -> Result<&str, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(("No username provided", StatusCode::BAD_REQUEST).into());
    }

    Ok(username)
}

/// Only the author may change or remove what they wrote.
pub fn ensure_author(
    author: &Author,
    username: &str,
    forbidden_msg: &'static str,
) -> Result<(), AppError> {
    if author.username != username {
        return Err((forbidden_msg, StatusCode::FORBIDDEN).into());
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn author(username: &str) -> Author {
        Author {
            id: 7,
            username: username.into(),
        }
    }

    #[test]
    fn test_acting_username_falls_back_to_anonymous() {
        assert_eq!(acting_username(None), ANONYMOUS);
        assert_eq!(acting_username(Some("")), ANONYMOUS);
        assert_eq!(acting_username(Some("   ")), ANONYMOUS);
        assert_eq!(acting_username(Some(" samwell ")), "samwell");
    }

    #[test]
    fn test_required_username_rejects_blank() {
        assert!(required_username("  ").is_err());
        assert_eq!(required_username(" gilly ").unwrap(), "gilly");
    }

    #[test]
    fn test_ensure_author_accepts_the_author() {
        assert!(ensure_author(&author("samwell"), "samwell", "nope").is_ok());
    }

    #[test]
    fn test_ensure_author_rejects_others() {
        let err = ensure_author(&author("samwell"), "gilly", "nope").unwrap_err();
        assert!(matches!(
            err,
            AppError::RequestError { status, .. } if status == StatusCode::FORBIDDEN
        ));
    }

    #[test]
    fn test_ensure_author_is_case_sensitive() {
        assert!(ensure_author(&author("Samwell"), "samwell", "nope").is_err());
    }

    #[test]
    fn test_identity_error_statuses() {
        assert_eq!(
            IdentityError::UsernameTaken.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            IdentityError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            IdentityError::UserNotFound.status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
