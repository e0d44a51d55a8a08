use axum::{
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use crate::error::AppError;

/// Body of responses that only acknowledge an action.
#[derive(Serialize, Debug)]
pub struct Message {
    pub message: &'static str,
}

// We define our own `Json` extractor that customizes the error from `axum::Json`
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            // convert the error from `axum::Json` into whatever we want
            Err(rejection) => Err((rejection.body_text(), StatusCode::BAD_REQUEST).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use axum::{body::Body, http::header::CONTENT_TYPE, response::IntoResponse};
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize, Debug)]
    struct MarkInput {
        content: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let Json(body) = Json::<MarkInput>::from_request(request(r#"{"content":"hi"}"#), &())
            .await
            .unwrap();
        assert_eq!(body.content, "hi");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let rejection = Json::<MarkInput>::from_request(request("{}"), &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let rejection = Json::<MarkInput>::from_request(request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
