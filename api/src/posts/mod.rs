pub mod create;
pub mod delete;
pub mod get;
pub mod patch;
pub mod routes;
pub mod vote;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    comments::CommentView,
    models::{post::Post, user::Author},
};

pub const DEFAULT_BOARD: &str = "General";

pub const MAX_BOARD_CHARS: usize = 100;
pub const MAX_TITLE_CHARS: usize = 300;
pub const MAX_CONTENT_CHARS: usize = 40_000;
pub const MAX_LINK_CHARS: usize = 2_048;

// The model that will be returned to the client
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub board: String,
    pub link: String,
    pub upvotes: i32,
    pub author_id: i32,
    pub author: Author,
    pub created_at: NaiveDateTime,

    // Only present on the detail view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,

    // Only present on listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
}

impl PostView {
    pub fn new(post: Post, author: Author) -> Self {
        PostView {
            id: post.id,
            title: post.title,
            content: post.content,
            board: post.board,
            link: post.link,
            upvotes: post.upvotes,
            author_id: post.author_id,
            author,
            created_at: post.created_at,
            comments: None,
            comment_count: None,
        }
    }

    pub fn with_comments(mut self, comments: Vec<CommentView>) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn with_comment_count(mut self, count: i64) -> Self {
        self.comment_count = Some(count);
        self
    }
}

/// Trims `value` and rejects it when longer than `max` characters. Returns
/// `None` for blank input.
pub fn trimmed_field(
    value: &str,
    max: usize,
    too_long: &'static str,
) -> Result<Option<String>, &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if value.chars().count() > max {
        return Err(too_long);
    }

    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn post() -> Post {
        Post {
            id: 3,
            title: "On dragons".into(),
            content: "They are back".into(),
            board: "GOTLore".into(),
            link: "".into(),
            upvotes: 2,
            author_id: 9,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 4, 14)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap(),
        }
    }

    fn author() -> Author {
        Author {
            id: 9,
            username: "archmaester".into(),
        }
    }

    #[test]
    fn test_trimmed_field() {
        assert_eq!(trimmed_field("   ", 5, "long"), Ok(None));
        assert_eq!(trimmed_field(" abc ", 5, "long"), Ok(Some("abc".into())));
        assert_eq!(trimmed_field("abcdef", 5, "long"), Err("long"));
    }

    #[test]
    fn test_trimmed_field_counts_chars_not_bytes() {
        assert_eq!(trimmed_field("ééééé", 5, "long"), Ok(Some("ééééé".into())));
    }

    #[test]
    fn test_listing_serializes_count_but_not_comments() {
        let view = PostView::new(post(), author()).with_comment_count(4);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["comment_count"], 4);
        assert!(json.get("comments").is_none());
        assert_eq!(json["author"]["username"], "archmaester");
        assert_eq!(json["created_at"], "2024-04-14T21:00:00");
    }

    #[test]
    fn test_detail_serializes_comments() {
        let view = PostView::new(post(), author()).with_comments(vec![]);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["comments"], serde_json::json!([]));
        assert!(json.get("comment_count").is_none());
    }
}
