use axum::{
    Router,
    routing::{get, post},
};

use crate::App;

use super::{create, delete, get as read, patch, vote};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/posts", get(read::list_posts).post(create::create_post))
        .route(
            "/posts/{id}",
            get(read::get_post)
                .put(patch::patch_post)
                .delete(delete::delete_post),
        )
        .route("/posts/{id}/vote", post(vote::vote_post))
        .route(
            "/posts/{id}/comments",
            post(crate::comments::create::create_comment),
        )
}
