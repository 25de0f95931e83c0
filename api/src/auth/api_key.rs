//! API key authentication middleware
//!
//! Staff present a bearer key; its SHA-256 digest is compared against the
//! configured digests. Borrowers never authenticate.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// The staff key that authorised a request, identified by a digest prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffIdentity {
    pub key_fingerprint: String,
}

/// Hash an API key for storage or comparison
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Authentication middleware for staff routes
///
/// Rejects the request unless the bearer key hashes to a configured digest,
/// then injects a `StaffIdentity` into request extensions.
pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;
    let key_hash = hash_api_key(api_key);

    if !state.staff_key_hashes.iter().any(|h| *h == key_hash) {
        tracing::warn!(
            path = %request.uri().path(),
            "Rejected staff request with unknown key"
        );
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(StaffIdentity {
        key_fingerprint: key_hash[..8].to_string(),
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::app::LoanPolicy;

    #[test]
    fn hash_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn bearer_key_is_extracted() {
        let request = Request::builder()
            .header("Authorization", "Bearer staff-key")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_api_key(&request), Some("staff-key"));

        let request = Request::builder()
            .header("Authorization", "Basic abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_api_key(&request), None);
    }

    fn whoami_app() -> Router {
        let state = AppState::in_memory(
            Arc::new(mockable::DefaultClock),
            LoanPolicy::default(),
            vec![hash_api_key("desk-key")],
        );
        Router::new()
            .route(
                "/whoami",
                get(|Extension(staff): Extension<StaffIdentity>| async move {
                    staff.key_fingerprint
                }),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                staff_auth_middleware,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn middleware_injects_staff_identity() {
        let response = whoami_app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", "Bearer desk-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], hash_api_key("desk-key")[..8].as_bytes());
    }

    #[tokio::test]
    async fn middleware_rejects_missing_key() {
        let response = whoami_app()
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
