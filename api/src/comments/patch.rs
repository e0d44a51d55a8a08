use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

use crate::{
    App,
    error::AppError,
    identity::{ensure_author, required_username},
    models::{comment::Comment, user::Author},
    schema::{comments, users},
};

use super::{CommentView, validate_content};

#[axum::debug_handler]
pub async fn patch_comment(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(patch): crate::json::Json<CommentPatch>,
) -> Result<Json<CommentView>, AppError> {
    let username = required_username(&patch.username)?;
    let content = validate_content(&patch.content).map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let author = comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id))
        .select(Author::as_select())
        .first::<Author>(&mut conn)
        .await
        .optional()?
        .ok_or(("Mark not found", StatusCode::NOT_FOUND))?;

    ensure_author(&author, username, "You cannot change another scribe's mark")?;

    let comment = diesel::update(comments::table.find(id))
        .set(comments::content.eq(content))
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(comment_id = id, "mark amended");

    Ok(Json(CommentView::new(comment, author)))
}

#[derive(Deserialize)]
pub struct CommentPatch {
    content: String,
    username: String,
}
