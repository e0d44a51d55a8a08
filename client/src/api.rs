//! Typed client for the Citadel REST backend. One method per endpoint.

use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    ClientError,
    models::{
        AuthResponse, Comment, ErrorBody, Message, NewScroll, Post, PostDetail, VoteDirection,
        VoteOutcome,
    },
};

#[derive(Debug, Clone)]
pub struct CitadelApi {
    http: reqwest::Client,
    base_url: String,
}

impl CitadelApi {
    pub fn new(host: &str) -> Result<Self, ClientError> {
        let base_url = host.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidHost(host.to_string()));
        }

        Ok(CitadelApi {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => "request failed".to_string(),
            };
            tracing::debug!(%status, %message, "request rejected");
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn ping(&self) -> Result<Message, ClientError> {
        self.send(self.request(Method::GET, "/ping")).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.send_json(
            Method::POST,
            "/register",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.send_json(
            Method::POST,
            "/login",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Newest first. `board` matches case-insensitively.
    pub async fn list_posts(&self, board: Option<&str>) -> Result<Vec<Post>, ClientError> {
        let mut request = self.request(Method::GET, "/posts");
        if let Some(board) = board {
            request = request.query(&[("board", board)]);
        }
        self.send(request).await
    }

    /// The scroll with all its marks and the vote `viewer` cast on it.
    pub async fn get_post(&self, id: i32, viewer: &str) -> Result<PostDetail, ClientError> {
        self.send(
            self.request(Method::GET, &format!("/posts/{id}"))
                .query(&[("username", viewer)]),
        )
        .await
    }

    pub async fn create_post(&self, scroll: &NewScroll<'_>) -> Result<Post, ClientError> {
        self.send_json(Method::POST, "/posts", scroll).await
    }

    /// Empty `title` or `content` leaves that field unchanged.
    pub async fn update_post(
        &self,
        id: i32,
        title: &str,
        content: &str,
        username: &str,
    ) -> Result<Post, ClientError> {
        self.send_json(
            Method::PUT,
            &format!("/posts/{id}"),
            &json!({ "title": title, "content": content, "username": username }),
        )
        .await
    }

    pub async fn delete_post(&self, id: i32, username: &str) -> Result<Message, ClientError> {
        self.send_json(
            Method::DELETE,
            &format!("/posts/{id}"),
            &json!({ "username": username }),
        )
        .await
    }

    /// Voting the same direction twice retracts the vote.
    pub async fn vote(
        &self,
        id: i32,
        direction: VoteDirection,
        username: &str,
    ) -> Result<VoteOutcome, ClientError> {
        self.send_json(
            Method::POST,
            &format!("/posts/{id}/vote"),
            &json!({ "value": direction.value(), "username": username }),
        )
        .await
    }

    pub async fn create_comment(
        &self,
        post_id: i32,
        content: &str,
        username: &str,
        parent_id: Option<i32>,
    ) -> Result<Comment, ClientError> {
        self.send_json(
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            &json!({ "content": content, "username": username, "parent_id": parent_id }),
        )
        .await
    }

    pub async fn update_comment(
        &self,
        id: i32,
        content: &str,
        username: &str,
    ) -> Result<Comment, ClientError> {
        self.send_json(
            Method::PUT,
            &format!("/comments/{id}"),
            &json!({ "content": content, "username": username }),
        )
        .await
    }

    pub async fn delete_comment(&self, id: i32, username: &str) -> Result<Message, ClientError> {
        self.send_json(
            Method::DELETE,
            &format!("/comments/{id}"),
            &json!({ "username": username }),
        )
        .await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_host_must_be_http() {
        assert!(matches!(
            CitadelApi::new("localhost:8080"),
            Err(ClientError::InvalidHost(_))
        ));
        assert!(CitadelApi::new("https://citadel.example").is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let api = CitadelApi::new(" http://localhost:8080/ ").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
    }
}
