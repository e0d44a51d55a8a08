use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    App,
    error::AppError,
    identity::{ActingUser, ensure_author, required_username},
    json::Message,
    models::user::Author,
    schema::{comments, users},
};

/// Erases a single mark. Its replies stay and are left without a parent.
#[axum::debug_handler]
pub async fn delete_comment(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(actor): crate::json::Json<ActingUser>,
) -> Result<Json<Message>, AppError> {
    let username = required_username(&actor.username)?;

    let mut conn = ctx.diesel.get().await?;

    let author = comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id))
        .select(Author::as_select())
        .first::<Author>(&mut conn)
        .await
        .optional()?
        .ok_or(("Mark not found", StatusCode::NOT_FOUND))?;

    ensure_author(&author, username, "You cannot erase another's mark")?;

    diesel::delete(comments::table.find(id))
        .execute(&mut conn)
        .await?;

    tracing::info!(comment_id = id, "mark erased");

    Ok(Json(Message {
        message: "Mark erased",
    }))
}
