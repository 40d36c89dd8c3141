//! Identity extraction for session endpoints.
//!
//! The upstream authentication gateway verifies the caller's token and
//! forwards the resolved identity in the `x-user-id` header. A missing or
//! empty identity is rejected here, before it can reach the session core.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;

use crate::response::ApiResponse;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug)]
pub struct UserIdentity(pub String);

impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiResponse<()>>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or("");

        if user_id.is_empty() {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error(
                    "NOT_AUTHENTICATED",
                    "Missing user identity",
                )),
            ));
        }

        Ok(Self(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<UserIdentity, StatusCode> {
        let (mut parts, _) = request.into_parts();
        UserIdentity::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn extracts_forwarded_identity() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "alice")
            .body(())
            .unwrap();
        let identity = extract(request).await.unwrap();
        assert_eq!(identity.0, "alice");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let request = Request::builder().body(()).unwrap();
        let status = extract(request).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_blank_identity() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        let status = extract(request).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
