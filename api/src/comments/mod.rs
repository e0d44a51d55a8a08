pub mod create;
pub mod delete;
pub mod patch;
pub mod routes;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{comment::Comment, user::Author};

pub const MAX_COMMENT_CHARS: usize = 5000;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub author_id: i32,
    pub author: Author,
    pub created_at: NaiveDateTime,
}

impl CommentView {
    pub fn new(comment: Comment, author: Author) -> Self {
        CommentView {
            id: comment.id,
            content: comment.content,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_id: comment.author_id,
            author,
            created_at: comment.created_at,
        }
    }
}

/// Marks must have content and stay under [`MAX_COMMENT_CHARS`].
pub fn validate_content(content: &str) -> Result<String, &'static str> {
    let content = content.trim();

    if content.is_empty() {
        return Err("Content cannot be empty");
    }

    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err("Content too long (max 5000 characters)");
    }

    Ok(content.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content("  "), Err("Content cannot be empty"));
        assert_eq!(validate_content(" well met "), Ok("well met".into()));

        let long = "a".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_content(&long).is_err());
    }

    #[test]
    fn test_root_comment_serializes_null_parent() {
        let view = CommentView::new(
            Comment {
                id: 1,
                content: "First".into(),
                post_id: 4,
                parent_id: None,
                author_id: 2,
                created_at: chrono::NaiveDate::from_ymd_opt(2024, 4, 14)
                    .unwrap()
                    .and_hms_opt(21, 0, 0)
                    .unwrap(),
            },
            Author {
                id: 2,
                username: "maester".into(),
            },
        );
        let json = serde_json::to_value(&view).unwrap();

        assert!(json["parent_id"].is_null());
        assert_eq!(json["author"]["username"], "maester");
    }
}
