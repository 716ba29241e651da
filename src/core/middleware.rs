//! HTTP plumbing shared by every router: bearer auth for the API, basic auth
//! for the Swagger UI, request ids, request spans and CORS.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::JwtValidator;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Time-ordered (UUID v7) request ids for requests that arrive without one
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// One `request` span per call. `user_id` stays empty until bearer auth
/// succeeds.
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            user_id = tracing::field::Empty,
        )
    }
}

/// `*` in `allowed_origins` allows any origin. The request id and the export
/// file name are readable by browser clients.
pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            header::CONTENT_DISPOSITION,
        ]);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Credential part of an `Authorization: <scheme> <credentials>` header.
/// The scheme is matched case-insensitively.
fn authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (given, credentials) = value.split_once(' ')?;
    let credentials = credentials.trim();
    (given.eq_ignore_ascii_case(scheme) && !credentials.is_empty()).then_some(credentials)
}

/// Guards the Swagger UI with `username:password` from the swagger config
pub async fn swagger_basic_auth(
    State(credentials): State<Arc<String>>,
    request: Request,
    next: Next,
) -> Response {
    let accepted = authorization(request.headers(), "Basic")
        .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
        .is_some_and(|decoded| decoded == credentials.as_bytes());

    if accepted {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Basic realm=\"Site Coordinator API\""),
        )],
        "Unauthorized",
    )
        .into_response()
}

/// Verifies the bearer token and stores the caller as an
/// [`AuthenticatedUser`](crate::features::auth::AuthenticatedUser) extension
pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !request.headers().contains_key(header::AUTHORIZATION) {
        return Err(AppError::Unauthorized(
            "Missing authorization header".to_string(),
        ));
    }
    let token = authorization(request.headers(), "Bearer").ok_or_else(|| {
        AppError::Unauthorized("Expected a bearer token".to_string())
    })?;

    let user = validator.validate_token(token)?;
    Span::current().record("user_id", tracing::field::display(user.user_id));

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::model::Claims;
    use crate::features::auth::AuthenticatedUser;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::time::Duration;

    const SECRET: &str = "middleware-secret-with-32-characters!";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn token() -> String {
        let claims = Claims {
            sub: Uuid::now_v7(),
            email: "foreman@harbour.test".to_string(),
            name: None,
            exp: (chrono::Utc::now().timestamp() + 600) as u64,
            iss: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn api() -> TestServer {
        let validator = Arc::new(JwtValidator::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
            jwt_leeway: Duration::from_secs(0),
        }));
        let router = Router::new()
            .route(
                "/whoami",
                get(|user: AuthenticatedUser| async move { user.email }),
            )
            .route_layer(from_fn_with_state(validator, auth_middleware));
        TestServer::new(router).unwrap()
    }

    #[test]
    fn test_authorization_scheme_is_case_insensitive() {
        assert_eq!(authorization(&headers("bearer abc"), "Bearer"), Some("abc"));
        assert_eq!(authorization(&headers("Bearer abc"), "Basic"), None);
        assert_eq!(authorization(&headers("Bearer "), "Bearer"), None);
        assert_eq!(authorization(&HeaderMap::new(), "Bearer"), None);
    }

    #[tokio::test]
    async fn test_bearer_token_reaches_handler_as_user() {
        let response = api()
            .get("/whoami")
            .authorization_bearer(token())
            .await;

        response.assert_status_ok();
        response.assert_text("foreman@harbour.test");
    }

    #[tokio::test]
    async fn test_missing_or_foreign_scheme_is_unauthorized() {
        let server = api();

        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/whoami")
            .add_header(header::AUTHORIZATION, "Token abc")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_swagger_requires_configured_credentials() {
        let router = Router::new().route("/docs", get(|| async { "docs" })).layer(
            from_fn_with_state(Arc::new("admin:s3cret".to_string()), swagger_basic_auth),
        );
        let server = TestServer::new(router).unwrap();

        let denied = server
            .get("/docs")
            .add_header(header::AUTHORIZATION, "Basic YWRtaW46d3Jvbmc=")
            .await;
        denied.assert_status(StatusCode::UNAUTHORIZED);
        assert!(denied.maybe_header(header::WWW_AUTHENTICATE).is_some());

        server
            .get("/docs")
            .add_header(header::AUTHORIZATION, "Basic YWRtaW46czNjcmV0")
            .await
            .assert_status_ok();
    }
}
