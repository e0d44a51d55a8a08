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
    identity::{self, UnknownUser},
    models::comment::{Comment, NewComment},
    schema::{comments, posts},
};

use super::{CommentView, validate_content};

#[axum::debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    Path(post_id): Path<i32>,
    crate::json::Json(submission): crate::json::Json<CommentSubmission>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let content = validate_content(&submission.content).map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let author = identity::resolve_actor(
        &mut conn,
        submission.username.as_deref(),
        UnknownUser::Reject,
    )
    .await?;

    let post_exists = posts::table
        .find(post_id)
        .select(posts::id)
        .first::<i32>(&mut conn)
        .await
        .optional()?
        .is_some();

    if !post_exists {
        return Err(("Scroll not found", StatusCode::NOT_FOUND).into());
    }

    // check if the parent mark actually belongs to the scroll
    if let Some(parent_id) = submission.parent_id {
        let parent_post = comments::table
            .find(parent_id)
            .select(comments::post_id)
            .first::<i32>(&mut conn)
            .await
            .optional()?;

        if parent_post != Some(post_id) {
            return Err((
                "You're replying to a mark that does not belong to this scroll",
                StatusCode::BAD_REQUEST,
            )
                .into());
        }
    }

    let comment = diesel::insert_into(comments::table)
        .values(&NewComment {
            content,
            post_id,
            parent_id: submission.parent_id,
            author_id: author.id,
            created_at: chrono::Utc::now().naive_utc(),
        })
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(
        comment_id = comment.id,
        post_id,
        parent_id = ?comment.parent_id,
        "mark left"
    );

    Ok((StatusCode::CREATED, Json(CommentView::new(comment, author))))
}

#[derive(Deserialize)]
pub struct CommentSubmission {
    content: String,
    username: Option<String>,
    parent_id: Option<i32>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_submission_parent_is_optional() {
        let s: CommentSubmission =
            serde_json::from_str(r#"{"content":"Winter is coming"}"#).unwrap();
        assert_eq!(s.parent_id, None);
        assert_eq!(s.username, None);

        let s: CommentSubmission =
            serde_json::from_str(r#"{"content":"Aye","username":"ned","parent_id":3}"#).unwrap();
        assert_eq!(s.parent_id, Some(3));
    }
}
