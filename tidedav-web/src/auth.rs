//! Optional HTTP Basic authentication.
//!
//! When credentials are configured every WebDAV method requires them; when
//! they are not, the middleware is a pass-through. There are no sessions,
//! each request carries its own Authorization header.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::{Engine as _, engine::general_purpose};

use crate::server::AppState;

const REALM: &str = "Basic realm=\"TorrServer WebDAV\"";

/// Middleware enforcing Basic auth when the config carries credentials.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(credentials) = state.config.credentials.as_ref() else {
        return next.run(request).await;
    };

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(encoded) = authorization.and_then(|v| v.strip_prefix("Basic ")) else {
        return challenge("Authentication required");
    };

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());

    let valid = decoded
        .as_deref()
        .and_then(|pair| pair.split_once(':'))
        .is_some_and(|(user, pass)| {
            user == credentials.username && pass == credentials.password
        });

    if valid {
        next.run(request).await
    } else {
        challenge("Invalid credentials")
    }
}

fn challenge(body: &'static str) -> Response {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, REALM)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
