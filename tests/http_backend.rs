//! HttpBackend against an in-process mock of the persistence service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use a11y_verify::backend::HttpBackend;
use a11y_verify::errors::RemoteSubmitError;
use a11y_verify::review::{DecisionRequest, SubmitSettings, VerificationSession};
use a11y_verify_common::{
    AutomatedFinding, BackendError, FindingStatus, JobMetadata, RemoteQueue, SubmitRequest,
    VerificationBackend, VerificationHistoryEntry, VerificationItem, VerificationMethod,
    VerificationStatus,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;

#[derive(Default)]
struct MockService {
    items: Vec<VerificationItem>,
    fail_ids: Vec<String>,
    token: Option<String>,
    bare_status: bool,
    submissions: Vec<SubmitRequest>,
}

type SharedService = Arc<Mutex<MockService>>;

fn authorized(service: &MockService, headers: &HeaderMap) -> bool {
    match &service.token {
        None => true,
        Some(token) => headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", token)),
    }
}

async fn queue_handler(
    State(service): State<SharedService>,
    headers: HeaderMap,
    Path(_job): Path<String>,
) -> Response {
    let service = service.lock().unwrap();
    if !authorized(&service, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let verified_count = service.items.iter().filter(|i| i.is_verified()).count();
    Json(RemoteQueue {
        items: service.items.clone(),
        verified_count,
        total_count: service.items.len(),
    })
    .into_response()
}

async fn submit_handler(
    State(service): State<SharedService>,
    headers: HeaderMap,
    Path((_job, item_id)): Path<(String, String)>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let mut service = service.lock().unwrap();
    if !authorized(&service, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    service.submissions.push(request.clone());
    if service.fail_ids.contains(&item_id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    if service.bare_status {
        return Json(serde_json::json!({
            "id": item_id,
            "criterionId": "1.1.1",
            "status": request.status,
        }))
        .into_response();
    }
    match service.items.iter_mut().find(|i| i.id == item_id) {
        Some(item) => {
            item.record(VerificationHistoryEntry::new(
                request.status,
                request.method,
                request.notes.clone(),
                "server",
            ));
            Json(item.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn job_handler(
    State(service): State<SharedService>,
    headers: HeaderMap,
    Path(job): Path<String>,
) -> Response {
    let service = service.lock().unwrap();
    if !authorized(&service, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match job.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "garbled" => "this is not json".into_response(),
        _ => Json(JobMetadata {
            job_id: job,
            file_name: "annual-report.pdf".to_string(),
            has_remediated_artifact: true,
        })
        .into_response(),
    }
}

async fn start(service: SharedService) -> String {
    let app = Router::new()
        .route("/api/jobs/{job}", get(job_handler))
        .route("/api/jobs/{job}/verification", get(queue_handler))
        .route("/api/jobs/{job}/verification/{item}", post(submit_handler))
        .with_state(service);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn service_with(ids: &[&str]) -> SharedService {
    let items = ids
        .iter()
        .map(|id| VerificationItem::new(*id, "1.4.1"))
        .collect();
    Arc::new(Mutex::new(MockService {
        items,
        ..MockService::default()
    }))
}

fn request(item_id: &str) -> SubmitRequest {
    SubmitRequest {
        item_id: item_id.to_string(),
        status: VerificationStatus::VerifiedPass,
        method: VerificationMethod::Nvda,
        notes: String::new(),
    }
}

#[tokio::test]
async fn test_fetch_job() {
    let base = start(service_with(&[])).await;
    let backend = HttpBackend::new(&base).unwrap();

    let job = backend.fetch_job("job-1").await.unwrap();
    assert_eq!(job.job_id, "job-1");
    assert_eq!(job.file_name, "annual-report.pdf");
    assert!(job.has_remediated_artifact);
}

#[tokio::test]
async fn test_http_errors_are_mapped() {
    let base = start(service_with(&[])).await;
    let backend = HttpBackend::new(&base).unwrap();

    let err = backend.fetch_job("missing").await.unwrap_err();
    assert!(matches!(err, BackendError::Http { status: 404, .. }));

    let err = backend.fetch_job("garbled").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let service = service_with(&["a"]);
    service.lock().unwrap().token = Some("secret".to_string());
    let base = start(service).await;

    let anonymous = HttpBackend::new(&base).unwrap();
    assert!(matches!(
        anonymous.fetch_queue("job-1").await.unwrap_err(),
        BackendError::Http { status: 401, .. }
    ));

    let authed = HttpBackend::new(&base).unwrap().with_token("secret");
    let queue = authed.fetch_queue("job-1").await.unwrap();
    assert_eq!(queue.total_count, 1);
}

#[tokio::test]
async fn test_submit_returns_confirmed_item() {
    let service = service_with(&["a"]);
    let base = start(service.clone()).await;
    let backend = HttpBackend::new(&base).unwrap();

    let item = backend.submit("job-1", &request("a")).await.unwrap();
    assert_eq!(item.id, "a");
    assert_eq!(item.status(), VerificationStatus::VerifiedPass);
    assert_eq!(item.history().len(), 1);
    assert_eq!(service.lock().unwrap().submissions.len(), 1);
}

#[tokio::test]
async fn test_submit_encodes_item_id() {
    let service = service_with(&["1.4.1#3"]);
    let base = start(service).await;
    let backend = HttpBackend::new(&base).unwrap();

    let item = backend.submit("job-1", &request("1.4.1#3")).await.unwrap();
    assert_eq!(item.id, "1.4.1#3");
}

#[tokio::test]
async fn test_session_round_trip_with_partial_failure() {
    let service = service_with(&["a", "b", "c"]);
    service.lock().unwrap().fail_ids = vec!["b".to_string()];
    let base = start(service.clone()).await;

    let backend = Arc::new(HttpBackend::new(&base).unwrap());
    let settings = SubmitSettings::new("job-1", "alex").with_timeout(Duration::from_secs(5));
    let mut session = VerificationSession::new(backend, settings);

    let stats = session.refresh_from_backend().await.unwrap();
    assert_eq!(stats.adopted, 3);

    let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let decision = DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::Nvda);
    let outcome = session.bulk_submit(&ids, &decision).await.unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert!(matches!(
        outcome.failures[0].1,
        RemoteSubmitError::Backend(BackendError::Http { status: 500, .. })
    ));
    assert_eq!(session.verified_count(), 3);

    let b = session.item("b").unwrap();
    assert_eq!(b.history().entries()[0].verified_by, "alex");
    let a = session.item("a").unwrap();
    assert_eq!(a.history().entries()[0].verified_by, "server");

    // A later refresh from the service (which never stored "b") keeps the local decision.
    session.refresh_from_backend().await.unwrap();
    assert_eq!(
        session.item("b").map(|i| i.status()),
        Some(VerificationStatus::VerifiedPass)
    );
}

#[tokio::test]
async fn test_local_findings_then_remote_submit() {
    let service = service_with(&["contrast"]);
    let base = start(service.clone()).await;

    let backend = Arc::new(HttpBackend::new(&base).unwrap());
    let mut session = VerificationSession::new(backend, SubmitSettings::new("job-1", "alex"));
    let findings = vec![AutomatedFinding::new(
        "contrast",
        "1.4.3",
        FindingStatus::Fail,
        0.45,
    )];
    session.refresh(&findings, &HashMap::new());

    let decision = DecisionRequest::new(VerificationStatus::VerifiedFail, VerificationMethod::ContrastAnalyzer)
        .with_notes("Body text 3.1:1 on grey");
    let outcome = session.submit("contrast", &decision).await.unwrap();

    assert!(outcome.is_remote());
    let service = service.lock().unwrap();
    let submitted = &service.submissions[0];
    assert_eq!(submitted.notes, "Body text 3.1:1 on grey");
    assert_eq!(submitted.method, VerificationMethod::ContrastAnalyzer);
}

#[tokio::test]
async fn test_bare_status_confirmation_keeps_reviewer_details() {
    let service = service_with(&["a"]);
    service.lock().unwrap().bare_status = true;
    let base = start(service).await;

    let backend = Arc::new(HttpBackend::new(&base).unwrap());
    let mut session = VerificationSession::new(backend, SubmitSettings::new("job-1", "alex"));
    session.refresh(
        &[AutomatedFinding::new("a", "1.1.1", FindingStatus::Pass, 0.5)],
        &HashMap::new(),
    );

    let started = chrono::Utc::now();
    let decision = DecisionRequest::new(VerificationStatus::VerifiedPass, VerificationMethod::Nvda);
    let outcome = session.submit("a", &decision).await.unwrap();

    assert!(outcome.is_remote());
    let entry = outcome.item.history().latest().unwrap().clone();
    assert_eq!(entry.verified_by, "alex");
    assert_eq!(entry.method, VerificationMethod::Nvda);
    assert!(entry.verified_at >= started);
}
