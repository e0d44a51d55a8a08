use axum::{Router, routing::put};

use crate::App;

use super::{delete::delete_comment, patch::patch_comment};

pub fn route() -> Router<App> {
    Router::<App>::new().route("/comments/{id}", put(patch_comment).delete(delete_comment))
}
