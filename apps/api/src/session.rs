use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the owner identity established by the external auth
/// provider (e.g. set by the gateway after token verification).
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting identity for one request. Injected explicitly into every store
/// operation — both query filtering and write authorization key off
/// `user_id`, never off ambient state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthorized)?;

        Ok(Session { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Session, AppError> {
        let (mut parts, _) = request.into_parts();
        Session::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_session_from_valid_header() {
        let user_id = Uuid::new_v4();
        let request = Request::builder()
            .header(USER_ID_HEADER, user_id.to_string())
            .body(())
            .unwrap();
        let session = extract(request).await.unwrap();
        assert_eq!(session.user_id, user_id);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_malformed_header_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized)
        ));
    }
}
