use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use diesel::{dsl::count_star, prelude::*};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use crate::{
    App,
    comments::CommentView,
    error::AppError,
    models::{comment::Comment, post::Post, user::Author},
    schema::{comments, posts, users, votes},
};

use super::PostView;

diesel::define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[derive(Deserialize)]
pub struct ListQuery {
    board: Option<String>,
}

/// Newest scrolls first, optionally limited to one board. Board names match
/// case-insensitively.
pub async fn list_posts(
    State(ctx): State<App>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let mut query = posts::table
        .inner_join(users::table)
        .select((Post::as_select(), Author::as_select()))
        .order((posts::created_at.desc(), posts::id.desc()))
        .into_boxed();

    let board = q.board.as_deref().map(str::trim).filter(|b| !b.is_empty());
    if let Some(board) = board {
        query = query.filter(lower(posts::board).eq(board.to_lowercase()));
    }

    let rows: Vec<(Post, Author)> = query.load(&mut conn).await?;

    tracing::debug!(?board, count = rows.len(), "listed scrolls");

    let counts = comment_counts(&mut conn, rows.iter().map(|(post, _)| post.id).collect()).await?;

    Ok(Json(
        rows.into_iter()
            .map(|(post, author)| {
                let count = counts.get(&post.id).copied().unwrap_or(0);
                PostView::new(post, author).with_comment_count(count)
            })
            .collect(),
    ))
}

async fn comment_counts(
    conn: &mut AsyncPgConnection,
    post_ids: Vec<i32>,
) -> QueryResult<HashMap<i32, i64>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, count_star()))
        .load::<(i32, i64)>(conn)
        .await?
        .into_iter()
        .collect())
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    username: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PostDetail {
    post: PostView,

    /// The viewer's current vote: -1, 0 or 1
    user_vote: i32,
}

pub async fn get_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    Query(q): Query<ViewerQuery>,
) -> Result<Json<PostDetail>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let (post, author) = posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id))
        .select((Post::as_select(), Author::as_select()))
        .first::<(Post, Author)>(&mut conn)
        .await
        .optional()?
        .ok_or(("Scroll not found", StatusCode::NOT_FOUND))?;

    // Creation order; readers rebuild the reply tree from parent ids
    let comments = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq(id))
        .order(comments::id.asc())
        .select((Comment::as_select(), Author::as_select()))
        .load::<(Comment, Author)>(&mut conn)
        .await?
        .into_iter()
        .map(|(comment, author)| CommentView::new(comment, author))
        .collect();

    let user_vote = match q.username.as_deref().map(str::trim) {
        Some(username) if !username.is_empty() => votes::table
            .inner_join(users::table)
            .filter(users::username.eq(username))
            .filter(votes::post_id.eq(id))
            .select(votes::value)
            .first::<i32>(&mut conn)
            .await
            .optional()?
            .unwrap_or(0),
        _ => 0,
    };

    Ok(Json(PostDetail {
        post: PostView::new(post, author).with_comments(comments),
        user_vote,
    }))
}
