//! Request correlation and the shared location-route rate limit.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reads the id placed by [`request_id`], or `"unknown"` when that layer
    /// did not run.
    fn of(req: &Request) -> String {
        req.extensions()
            .get::<RequestId>()
            .map_or_else(|| "unknown".to_owned(), |id| id.0.clone())
    }
}

/// Tags every request with an id, taken from `x-request-id` when the caller
/// sent one and a fresh `UUIDv4` otherwise, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    served: usize,
}

/// Fixed-window budget shared by every location route.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                started_at: Instant::now(),
                served: 0,
            })),
        }
    }

    /// Counts one request against the current window.
    ///
    /// # Errors
    ///
    /// Returns the time left until the window resets when the budget is
    /// already spent.
    pub async fn try_acquire(&self) -> Result<(), Duration> {
        let mut window = self.current.lock().await;
        let elapsed = window.started_at.elapsed();
        if elapsed >= self.window {
            window.started_at = Instant::now();
            window.served = 0;
        } else if window.served >= self.max_requests {
            return Err(self.window - elapsed);
        }
        window.served += 1;
        Ok(())
    }
}

/// Rejects requests over the [`RateLimiter`] budget with a `rate_limited`
/// error envelope and a `Retry-After` header in whole seconds.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if let Err(resets_in) = limiter.try_acquire().await {
        let retry_after_secs = resets_in.as_secs() + u64::from(resets_in.subsec_nanos() > 0);
        tracing::warn!(
            max_requests = limiter.max_requests,
            retry_after_secs,
            path = %req.uri().path(),
            "location rate limit exceeded"
        );
        let mut res = ApiError::new(
            RequestId::of(&req),
            "rate_limited",
            format!("too many requests; retry in {retry_after_secs}s"),
        )
        .into_response();
        res.headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        return res;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn echo_router() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(request_id))
    }

    async fn echoed_id(header: Option<&str>) -> String {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = echo_router()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        assert_eq!(echoed_id(Some("req-42")).await, "req-42");
    }

    #[tokio::test]
    async fn missing_or_blank_request_id_is_generated() {
        for header in [None, Some("  ")] {
            let id = echoed_id(header).await;
            assert!(Uuid::parse_str(&id).is_ok(), "expected a UUID, got {id}");
        }
    }

    #[tokio::test]
    async fn limiter_rejects_once_window_budget_is_spent() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire().await.is_ok());
        assert!(limiter.try_acquire().await.is_ok());
        let resets_in = limiter.try_acquire().await.unwrap_err();
        assert!(resets_in <= Duration::from_secs(60));
        assert!(resets_in > Duration::from_secs(59));
    }

    #[tokio::test]
    async fn limiter_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.try_acquire().await.is_ok());
        assert!(limiter.try_acquire().await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.try_acquire().await.is_ok());
    }
}
