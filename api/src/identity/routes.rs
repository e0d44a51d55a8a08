use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::user::{Author, NewUser, User},
    schema::users,
};

use super::{
    ANONYMOUS, IdentityError,
    password::{hash_password, verify_password},
};

const MAX_USERNAME_CHARS: usize = 50;
const MAX_PASSWORD_BYTES: usize = 256;

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    fn validate(&mut self) -> Result<(), &'static str> {
        self.username = self.username.trim().to_string();

        if self.username.is_empty() || self.password.trim().is_empty() {
            return Err("Please enter both username and password");
        }

        if self.username.chars().count() > MAX_USERNAME_CHARS {
            return Err("Username too long (max 50 characters)");
        }

        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err("Password too long");
        }

        Ok(())
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    message: &'static str,
    user: Author,
}

#[axum::debug_handler]
async fn register(
    State(ctx): State<App>,
    crate::json::Json(mut credentials): crate::json::Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    credentials
        .validate()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    if credentials.username.eq_ignore_ascii_case(ANONYMOUS) {
        return Err(IdentityError::ReservedUsername.into());
    }

    let password_hash = hash_password(credentials.password).await?;

    let mut conn = ctx.diesel.get().await?;

    let user = diesel::insert_into(users::table)
        .values(&NewUser {
            username: credentials.username,
            password_hash,
            created_at: chrono::Utc::now().naive_utc(),
        })
        .returning(Author::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                IdentityError::UsernameTaken.into()
            }
            e => AppError::from(e),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

#[axum::debug_handler]
async fn login(
    State(ctx): State<App>,
    crate::json::Json(mut credentials): crate::json::Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    credentials
        .validate()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let user = users::table
        .filter(users::username.eq(&credentials.username))
        .select(User::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or(IdentityError::InvalidCredentials)?;

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        tracing::debug!(username = %user.username, "password mismatch");
        return Err(IdentityError::InvalidCredentials.into());
    }

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: user.into(),
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_validate_trims_username() {
        let mut c = credentials("  jon  ", "ghost");
        assert!(c.validate().is_ok());
        assert_eq!(c.username, "jon");
    }

    #[test]
    fn test_validate_requires_both_fields() {
        assert!(credentials("", "ghost").validate().is_err());
        assert!(credentials("jon", "   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_username() {
        let long = "a".repeat(MAX_USERNAME_CHARS + 1);
        assert_eq!(
            credentials(&long, "ghost").validate(),
            Err("Username too long (max 50 characters)")
        );

        let exact = "a".repeat(MAX_USERNAME_CHARS);
        assert!(credentials(&exact, "ghost").validate().is_ok());
    }
}
