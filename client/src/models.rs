//! The payloads exchanged with the Citadel backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i32,
    pub username: String,
}

/// A mark, as stored. `parent_id` may name a mark that no longer exists.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub author: Author,
    pub created_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub board: String,
    #[serde(default)]
    pub link: String,
    pub upvotes: i32,
    pub author: Author,
    pub created_at: NaiveDateTime,

    #[serde(default)]
    pub comments: Vec<Comment>,

    // Listings carry a count instead of the marks themselves
    #[serde(default)]
    pub comment_count: Option<i64>,
}

impl Post {
    pub fn mark_count(&self) -> i64 {
        self.comment_count.unwrap_or(self.comments.len() as i64)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub user_vote: i32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VoteOutcome {
    pub upvotes: i32,
    pub user_vote: i32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub user: Author,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i32 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct NewScroll<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub username: &'a str,
    pub board: &'a str,
    pub link: &'a str,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_listing_post_without_comments() {
        let post: Post = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "Who is Azor Ahai?",
                "content": "Discuss.",
                "board": "FanTheories",
                "link": "",
                "upvotes": -2,
                "author_id": 4,
                "author": {"id": 4, "username": "melisandre"},
                "created_at": "2024-04-14T21:00:00.123456",
                "comment_count": 3
            }"#,
        )
        .unwrap();

        assert!(post.comments.is_empty());
        assert_eq!(post.mark_count(), 3);
        assert_eq!(post.upvotes, -2);
    }

    #[test]
    fn test_detail_post_counts_embedded_comments() {
        let detail: PostDetail = serde_json::from_str(
            r#"{
                "post": {
                    "id": 1,
                    "title": "t",
                    "content": "c",
                    "board": "GOTLore",
                    "upvotes": 0,
                    "author": {"id": 4, "username": "melisandre"},
                    "created_at": "2024-04-14T21:00:00",
                    "comments": [{
                        "id": 9,
                        "content": "Stannis",
                        "post_id": 1,
                        "parent_id": null,
                        "author_id": 5,
                        "author": {"id": 5, "username": "davos"},
                        "created_at": "2024-04-14T22:00:00"
                    }]
                },
                "user_vote": -1
            }"#,
        )
        .unwrap();

        assert_eq!(detail.user_vote, -1);
        assert_eq!(detail.post.mark_count(), 1);
        assert_eq!(detail.post.link, "");
        assert_eq!(detail.post.comments[0].parent_id, None);
    }

    #[test]
    fn test_vote_direction_values() {
        assert_eq!(VoteDirection::Up.value(), 1);
        assert_eq!(VoteDirection::Down.value(), -1);
    }
}
