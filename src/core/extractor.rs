use axum::{
    body::Body,
    extract::{
        rejection::JsonRejection, FromRequest, FromRequestParts, OptionalFromRequestParts, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Anonymous callers on public routes extract as `None`
impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthenticatedUser>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use axum::http::Request as HttpRequest;
    use uuid::Uuid;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            display_name: "A".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let (mut parts, _) = HttpRequest::new(()).into_parts();
        let result =
            <AuthenticatedUser as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_optional_user() {
        let (mut parts, _) = HttpRequest::new(()).into_parts();
        let anonymous =
            <AuthenticatedUser as OptionalFromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert!(anonymous.is_none());

        let expected = user();
        parts.extensions.insert(expected.clone());
        let found =
            <AuthenticatedUser as OptionalFromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(found.map(|u| u.id), Some(expected.id));
    }
}
