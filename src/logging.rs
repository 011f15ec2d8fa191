//! Middleware for logging requests and responses.

use axum::{
    body::Bytes,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use unicode_segmentation::UnicodeSegmentation;

/// The number of characters of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Multipart bodies carry receipt files, so only their size is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if is_multipart(&parts) {
        tracing::info!(
            "Received request: {parts:#?}\nbody: <multipart form, {} bytes>",
            body_bytes.len()
        );
    } else {
        log_request(&parts, &String::from_utf8_lossy(&body_bytes));
    }

    let request = Request::from_parts(parts, body_bytes.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, body_bytes.into())
}

fn is_multipart(parts: &axum::http::request::Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is short enough.
fn truncate(body: &str) -> Option<String> {
    let mut graphemes = body.graphemes(true);
    let head = graphemes
        .by_ref()
        .take(LOG_BODY_LENGTH_LIMIT)
        .collect::<String>();

    graphemes.next().map(|_| head)
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(head) => {
            tracing::info!("Received request: {parts:#?}\nbody: {head}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(head) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {head}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate};

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate("valor=15,50"), None);
        assert_eq!(truncate(&"a".repeat(LOG_BODY_LENGTH_LIMIT)), None);
    }

    #[test]
    fn truncates_on_character_boundary() {
        let body = "ç".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let got = truncate(&body).expect("want truncated body");

        assert_eq!(got.chars().count(), LOG_BODY_LENGTH_LIMIT);
    }

    #[tokio::test]
    async fn passes_body_through() {
        let app = Router::new()
            .route("/eco", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");
        let body = "descrição=".repeat(20);

        let response = server.post("/eco").text(body.clone()).await;

        response.assert_status_ok();
        assert_eq!(response.text(), body);
    }
}
