pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::resume::handlers as resumes;
use crate::state::AppState;

/// Base64 resume batches are far larger than axum's 2 MB default.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidates
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(candidates::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/status",
            patch(candidates::handle_update_status),
        )
        .route(
            "/api/v1/candidates/status",
            post(candidates::handle_batch_update_status),
        )
        .route(
            "/api/v1/candidates/:id/evaluation",
            get(candidates::handle_get_evaluation).post(candidates::handle_generate_evaluation),
        )
        // Imports
        .route(
            "/api/v1/candidates/import",
            post(candidates::handle_import_candidate),
        )
        .route(
            "/api/v1/candidates/batch-import",
            post(candidates::handle_batch_import),
        )
        .route(
            "/api/v1/candidates/import-file",
            post(candidates::handle_import_file),
        )
        // Resumes
        .route("/api/v1/resumes/parse", post(resumes::handle_parse_resume))
        .route("/api/v1/resumes/import", post(resumes::handle_import_resumes))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::candidates::store::testing::MemoryStore;
    use crate::resume::archive::testing::MemoryArchive;
    use crate::resume::info_extract::testing::{resume, CannedResumeExtractor};
    use crate::resume::pipeline::ResumePipeline;
    use crate::resume::text_extract::testing::CannedTextExtractor;
    use crate::state::testing::test_state;

    struct Harness {
        store: Arc<MemoryStore>,
        archive: Arc<MemoryArchive>,
        router: Router,
    }

    fn harness_with(store: MemoryStore, archive: MemoryArchive) -> Harness {
        let store = Arc::new(store);
        let archive = Arc::new(archive);
        let pipeline = ResumePipeline::new(
            Arc::new(CannedTextExtractor::with(&[
                ("ann-pdf", "ann resume"),
                ("bob-docx", "bob resume"),
                ("blank-pdf", "unreadable"),
            ])),
            Arc::new(CannedResumeExtractor::with(&[
                ("ann resume", resume("Ann", "Engineer")),
                ("bob resume", resume("Bob", "Designer")),
            ])),
        );
        let router = build_router(test_state(store.clone(), pipeline, archive.clone()));
        Harness {
            store,
            archive,
            router,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::default(), MemoryArchive::default())
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_file(filename: &str, content: &str) -> Request<Body> {
        let boundary = "recruit-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/candidates/import-file")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn resume_file(filename: &str, bytes: &[u8]) -> Value {
        json!({ "filename": filename, "fileData": STANDARD.encode(bytes) })
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recruit-api");
    }

    #[tokio::test]
    async fn test_empty_batch_import() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json("/api/v1/candidates/batch-import", json!({ "candidates": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "total": 0, "successCount": 0, "failureCount": 0, "results": [] })
        );
    }

    #[tokio::test]
    async fn test_batch_import_isolates_bad_email() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/batch-import",
                json!({ "candidates": [
                    { "name": "Ann", "position": "Engineer" },
                    { "name": "Bob", "position": "Sales", "email": "not-an-email" },
                    { "name": "Cid", "position": "Support", "yearsOfExperience": 4 }
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["successCount"], 2);
        assert_eq!(body["failureCount"], 1);
        assert_eq!(body["results"][1]["success"], false);
        assert_eq!(body["results"][1]["name"], "Bob");
        assert!(body["results"][1]["error"]
            .as_str()
            .unwrap()
            .contains("not-an-email"));
        assert_eq!(h.store.stored_names(), vec!["Ann", "Cid"]);
    }

    #[tokio::test]
    async fn test_batch_import_schema_violation_rejects_whole_call() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/batch-import",
                json!({ "candidates": [
                    { "name": "Ann", "position": "Engineer" },
                    { "name": "Bob", "position": "" }
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_import_over_cap_rejected() {
        let h = harness();
        let candidates: Vec<_> = (0..4)
            .map(|i| json!({ "name": format!("C{i}"), "position": "Dev" }))
            .collect();
        let (status, _) = send(
            &h.router,
            post_json("/api/v1/candidates/batch-import", json!({ "candidates": candidates })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_import_rejects_bad_email() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/import",
                json!({ "name": "Ann", "position": "Engineer", "email": "not-an-email" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("not-an-email"));
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_import_store_rejection_is_400() {
        let h = harness_with(MemoryStore::failing_parent(&["Ann"]), MemoryArchive::default());
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/import",
                json!({ "name": "Ann", "position": "Engineer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("duplicate candidate 'Ann'"));
        assert!(h.store.stored_names().is_empty());
    }

    #[tokio::test]
    async fn test_single_import_rejects_negative_years() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/import",
                json!({ "name": "Ann", "position": "Engineer", "yearsOfExperience": -1 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("yearsOfExperience"));
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_import_returns_id() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/import",
                json!({
                    "name": "Ann",
                    "position": "Engineer",
                    "email": "ann@example.com",
                    "skills": [{ "name": "Rust", "level": "expert" }]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "candidateId": 1 }));
        assert!(h.store.has_children(1));
    }

    #[tokio::test]
    async fn test_import_csv_file_reports_dropped_rows() {
        let h = harness();
        let csv = "name,position,email\nAnn,Engineer,ann@example.com\n,,nobody@example.com\nCid,Support,";
        let (status, body) = send(&h.router, post_file("people.csv", csv)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["successCount"], 2);
        assert_eq!(body["droppedRows"], json!([2]));
    }

    #[tokio::test]
    async fn test_import_json_file_single_object() {
        let h = harness();
        let (status, body) =
            send(&h.router, post_file("one.json", r#"{"name":"Carol","position":"PM"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"][0]["name"], "Carol");
        assert_eq!(body["droppedRows"], json!([]));
    }

    #[tokio::test]
    async fn test_import_file_rejects_bad_input() {
        let h = harness();
        let (status, _) = send(&h.router, post_file("people.txt", "name,position")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&h.router, post_file("people.csv", "name,position\n")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&h.router, post_file("people.json", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resume_import_skips_failures_with_warnings() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/resumes/import",
                json!({ "files": [
                    resume_file("ann.pdf", b"ann-pdf"),
                    resume_file("photo.png", b"png"),
                    resume_file("broken.pdf", b"garbage"),
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["total"], 1);
        assert_eq!(body["result"]["results"][0]["name"], "Ann");
        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].as_str().unwrap().starts_with("photo.png"));
        assert!(warnings[1].as_str().unwrap().starts_with("broken.pdf"));

        let stored = h.store.stored(1).unwrap();
        let key = stored.resume_file_key.unwrap();
        assert!(key.starts_with("resumes/") && key.ends_with("/ann.pdf"));
        assert_eq!(h.archive.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resume_import_nothing_parsed_is_422() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/resumes/import",
                json!({ "files": [
                    resume_file("blank.pdf", b"blank-pdf"),
                    resume_file("notes.txt", b"text"),
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "NOTHING_PARSED");
        assert_eq!(body["error"]["details"]["warnings"].as_array().unwrap().len(), 2);
        assert!(h.store.insert_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resume_archive_failure_is_a_warning() {
        let archive = MemoryArchive {
            fail_for: vec!["bob.docx".to_string()],
            ..MemoryArchive::default()
        };
        let h = harness_with(MemoryStore::default(), archive);
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/resumes/import",
                json!({ "files": [resume_file("bob.docx", b"bob-docx")] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["successCount"], 1);
        assert!(body["warnings"][0].as_str().unwrap().contains("archiving failed"));
        assert_eq!(h.store.stored(1).unwrap().resume_file_key, None);
    }

    #[tokio::test]
    async fn test_parse_resume() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json("/api/v1/resumes/parse", resume_file("ann.pdf", b"ann-pdf")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ann");
        assert_eq!(body["position"], "Engineer");
        assert!(h.store.insert_calls().is_empty());

        let (status, _) = send(
            &h.router,
            post_json("/api/v1/resumes/parse", resume_file("ann.txt", b"ann-pdf")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &h.router,
            post_json("/api/v1/resumes/parse", resume_file("broken.pdf", b"garbage")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_invalid_status_rejected_before_database() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_json(
                "/api/v1/candidates/status",
                json!({ "candidateIds": [1, 2], "status": "invalid_status" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
