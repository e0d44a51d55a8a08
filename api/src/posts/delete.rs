use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::{
    App,
    error::AppError,
    identity::{ActingUser, ensure_author, required_username},
    json::Message,
    models::user::Author,
    schema::{comments, posts, users, votes},
};

/// Removes a scroll together with its marks and votes.
#[axum::debug_handler]
pub async fn delete_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(actor): crate::json::Json<ActingUser>,
) -> Result<Json<Message>, AppError> {
    let username = required_username(&actor.username)?;

    let mut conn = ctx.diesel.get().await?;

    let author = posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id))
        .select(Author::as_select())
        .first::<Author>(&mut conn)
        .await
        .optional()?
        .ok_or(("Scroll not found", StatusCode::NOT_FOUND))?;

    ensure_author(&author, username, "Only the author can burn the scroll")?;

    conn.transaction(|conn| {
        Box::pin(async move {
            diesel::delete(comments::table.filter(comments::post_id.eq(id)))
                .execute(conn)
                .await?;
            diesel::delete(votes::table.filter(votes::post_id.eq(id)))
                .execute(conn)
                .await?;
            diesel::delete(posts::table.find(id)).execute(conn).await?;

            Ok::<_, diesel::result::Error>(())
        })
    })
    .await?;

    tracing::info!(post_id = id, "scroll burned");

    Ok(Json(Message {
        message: "Scroll banished to the Wall",
    }))
}
