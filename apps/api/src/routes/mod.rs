pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom over the file limit for the text fields and multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analyses",
            post(handlers::handle_create_analysis).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::submission::DEFAULT_MAX_UPLOAD_BYTES;
    use crate::config::Config;
    use crate::llm_client::testing::{client, ScriptedTransport};

    const BOUNDARY: &str = "XBOUNDARYX";

    fn state(transport: Arc<ScriptedTransport>) -> AppState {
        state_with_limit(transport, DEFAULT_MAX_UPLOAD_BYTES)
    }

    fn state_with_limit(transport: Arc<ScriptedTransport>, max_upload_bytes: usize) -> AppState {
        AppState {
            llm: client(transport),
            config: Config {
                gemini_api_key: "test-key".to_string(),
                gemini_model: "gemini-1.5-flash".to_string(),
                gemini_api_base: "http://localhost".to_string(),
                llm_temperature: 0.3,
                llm_max_output_tokens: 3000,
                llm_timeout: Duration::from_secs(5),
                llm_max_attempts: 3,
                llm_backoff_step: Duration::from_secs(5),
                max_upload_bytes,
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    fn multipart_body(job_description: &str, file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in [
            ("company", "Globex"),
            ("job_title", "Frontend Engineer"),
            ("job_description", job_description),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analysis_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn long_job_description() -> String {
        "We need a JavaScript and React engineer who ships accessible product features. "
            .repeat(8)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = build_router(state(Arc::new(ScriptedTransport::statuses(&[(500, "")]))));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_service_failure_still_returns_fallback_result() {
        let transport = Arc::new(ScriptedTransport::statuses(&[(403, "")]));
        let app = build_router(state(transport.clone()));

        let body = multipart_body(
            &long_job_description(),
            Some(("application/pdf", b"%PDF-1.4 truncated")),
        );
        let response = app.oneshot(analysis_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.call_count(), 1);
        let json = json_body(response).await;
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["notice"], "AI connection issue. Showing estimated results.");
        assert_eq!(json["overallBadge"]["label"], "Strong");
        assert_eq!(json["result"]["overallScore"], 72);
        assert_eq!(json["result"]["sections"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_short_job_description_is_rejected_before_any_call() {
        let transport = Arc::new(ScriptedTransport::statuses(&[(500, "")]));
        let app = build_router(state(transport.clone()));

        let body = multipart_body("too short", Some(("application/pdf", b"%PDF-1.4")));
        let response = app.oneshot(analysis_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transport.call_count(), 0);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let transport = Arc::new(ScriptedTransport::statuses(&[(500, "")]));
        let app = build_router(state(transport));

        let response = app
            .oneshot(analysis_request(multipart_body(&long_job_description(), None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please upload your resume as a PDF."
        );
    }

    #[tokio::test]
    async fn test_huge_upload_limit_does_not_overflow_body_limit() {
        let transport = Arc::new(ScriptedTransport::statuses(&[(503, "")]));
        let response = build_router(state_with_limit(transport, usize::MAX))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
