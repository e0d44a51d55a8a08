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
    models::{
        post::{Post, UpdatePost},
        user::Author,
    },
    schema::{posts, users},
};

use super::{MAX_CONTENT_CHARS, MAX_TITLE_CHARS, PostView, trimmed_field};

/// Rewrites a scroll's title and/or content. Blank fields are left as they are.
#[axum::debug_handler]
pub async fn patch_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(patch): crate::json::Json<PostPatch>,
) -> Result<Json<PostView>, AppError> {
    let username = required_username(&patch.username)?;
    let changes = patch
        .changes()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let (post, author) = posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id))
        .select((Post::as_select(), Author::as_select()))
        .first::<(Post, Author)>(&mut conn)
        .await
        .optional()?
        .ok_or(("Scroll not found", StatusCode::NOT_FOUND))?;

    ensure_author(&author, username, "Only the author can rewrite this scroll")?;

    if changes.is_empty() {
        return Ok(Json(PostView::new(post, author)));
    }

    let post = diesel::update(posts::table.find(id))
        .set(&changes)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(post_id = post.id, "scroll rewritten");

    Ok(Json(PostView::new(post, author)))
}

#[derive(Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    username: String,
}

impl PostPatch {
    fn changes(&self) -> Result<UpdatePost, &'static str> {
        Ok(UpdatePost {
            title: trimmed_field(&self.title, MAX_TITLE_CHARS, "Title too long")?,
            content: trimmed_field(
                &self.content,
                MAX_CONTENT_CHARS,
                "Content too long (max 40000 characters)",
            )?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blank_fields_are_not_changed() {
        let patch: PostPatch =
            serde_json::from_str(r#"{"title":"  ","username":"tyrion"}"#).unwrap();
        let changes = patch.changes().unwrap();

        assert!(changes.is_empty());
    }

    #[test]
    fn test_changes_are_trimmed() {
        let patch: PostPatch = serde_json::from_str(
            r#"{"title":" New title ","content":"New body","username":"tyrion"}"#,
        )
        .unwrap();

        assert_eq!(
            patch.changes().unwrap(),
            UpdatePost {
                title: Some("New title".into()),
                content: Some("New body".into()),
            }
        );
    }

    #[test]
    fn test_username_is_required_in_body() {
        assert!(serde_json::from_str::<PostPatch>(r#"{"title":"x"}"#).is_err());
    }
}
