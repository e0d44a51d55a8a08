use axum::{Json, extract::State, http::StatusCode};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

use crate::{
    App,
    error::AppError,
    identity::{self, UnknownUser},
    models::post::{NewPost, Post},
    schema::posts,
};

use super::{
    DEFAULT_BOARD, MAX_BOARD_CHARS, MAX_CONTENT_CHARS, MAX_LINK_CHARS, MAX_TITLE_CHARS,
    PostView, trimmed_field,
};

#[axum::debug_handler]
pub async fn create_post(
    State(ctx): State<App>,
    crate::json::Json(submission): crate::json::Json<PostSubmission>,
) -> Result<(StatusCode, Json<PostView>), AppError> {
    let valid = submission
        .validate()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let author = identity::resolve_actor(
        &mut conn,
        submission.username.as_deref(),
        UnknownUser::ActAsAnonymous,
    )
    .await?;

    let post = diesel::insert_into(posts::table)
        .values(&NewPost {
            title: valid.title,
            content: valid.content,
            board: valid.board,
            link: valid.link,
            author_id: author.id,
            created_at: chrono::Utc::now().naive_utc(),
        })
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(
        post_id = post.id,
        board = %post.board,
        author = %author.username,
        "scroll scribed"
    );

    Ok((StatusCode::CREATED, Json(PostView::new(post, author))))
}

#[derive(Deserialize)]
pub struct PostSubmission {
    title: String,
    content: String,
    username: Option<String>,
    board: Option<String>,
    link: Option<String>,
}

#[derive(Debug, PartialEq)]
struct ValidPost {
    title: String,
    content: String,
    board: String,
    link: String,
}

impl PostSubmission {
    fn validate(&self) -> Result<ValidPost, &'static str> {
        const REQUIRED: &str = "Title and Content are required";

        let title =
            trimmed_field(&self.title, MAX_TITLE_CHARS, "Title too long")?.ok_or(REQUIRED)?;
        let content = trimmed_field(
            &self.content,
            MAX_CONTENT_CHARS,
            "Content too long (max 40000 characters)",
        )?
        .ok_or(REQUIRED)?;

        let board = trimmed_field(
            self.board.as_deref().unwrap_or_default(),
            MAX_BOARD_CHARS,
            "Board name too long",
        )?
        .unwrap_or_else(|| DEFAULT_BOARD.into());
        let link = trimmed_field(
            self.link.as_deref().unwrap_or_default(),
            MAX_LINK_CHARS,
            "Link too long",
        )?
        .unwrap_or_default();

        Ok(ValidPost {
            title,
            content,
            board,
            link,
        })
    }
}
