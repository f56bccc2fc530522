use crate::core::error::AppError;
use crate::features::auth::access::is_public_path;
use crate::features::auth::SessionService;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

fn bearer_token(req: &Request) -> Option<Result<String, AppError>> {
    let value = req.headers().get(header::AUTHORIZATION)?;

    Some(
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid authorization header format".to_string())
            }),
    )
}

/// Global access gate.
///
/// Resolves the bearer session when one is sent and stores the user in the
/// request extensions. Paths outside the public allow-list are rejected with
/// 401 unless a valid session was resolved. On public paths a missing or
/// invalid token falls through as an anonymous request.
pub async fn access_gate(
    State(sessions): State<Arc<SessionService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let public = is_public_path(req.uri().path());

    let resolved = match bearer_token(&req) {
        None => Err(AppError::Unauthorized(
            "Missing authorization header".to_string(),
        )),
        Some(Err(e)) => Err(e),
        Some(Ok(token)) => sessions.authenticate(&token).await,
    };

    match resolved {
        Ok(user) => {
            req.extensions_mut().insert(user);
        }
        Err(e) if public => {
            if req.headers().contains_key(header::AUTHORIZATION) {
                tracing::debug!("Ignoring unusable credentials on public path: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("Rejected request to {}: {}", req.uri().path(), e);
            return Err(e);
        }
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    fn server() -> TestServer {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let sessions = Arc::new(SessionService::new(
            pool,
            TokenService::new("test-secret-that-is-at-least-32-bytes!!"),
            Duration::from_secs(3600),
        ));

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/api/news", get(|| async { "news" }))
            .route("/api/reports/mine", get(|| async { "mine" }))
            .route("/api/newsletter", get(|| async { "other" }))
            .layer(from_fn_with_state(sessions, access_gate));

        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_public_path_without_token() {
        let server = server();
        server.get("/health").await.assert_status_ok();
        server.get("/api/news").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_path_without_token() {
        let response = server().get("/api/reports/mine").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_protected_path_with_bad_token() {
        let server = server();

        server
            .get("/api/reports/mine")
            .authorization_bearer("not-a-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/api/reports/mine")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_path_ignores_bad_token() {
        server()
            .get("/api/news")
            .authorization_bearer("not-a-token")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_public() {
        server()
            .get("/api/newsletter")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
