#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::DashMap;
use serde_json::{Map, Value, json};

use resume_tracker::config::Config;
use resume_tracker::page::Page;
use resume_tracker::state::SharedState;
use resume_tracker::views::RenderedTable;

pub const TEST_TOKEN: &str = "test-csrf-token";

/// Search queries containing this word are answered slowly.
pub const SLOW_QUERY: &str = "slow";

const REQUIRED_FIELDS: [&str; 7] = [
    "recruiter_firm",
    "client_name",
    "recruiter_name",
    "recruiter_contact",
    "submission_date",
    "position",
    "job_id",
];

/// A POST the mock backend received.
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub path: String,
    pub csrf: Option<String>,
    pub fields: Map<String, Value>,
}

/// In-memory stand-in for the submissions backend.
pub struct MockBackend {
    submissions: DashMap<i64, Value>,
    next_id: AtomicI64,
    pub csrf_hits: AtomicUsize,
    pub search_hits: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub posts: Mutex<Vec<RecordedPost>>,
}

impl MockBackend {
    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn search_hits(&self) -> usize {
        self.search_hits.load(Ordering::SeqCst)
    }

    pub fn csrf_hits(&self) -> usize {
        self.csrf_hits.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: i64) -> Option<Value> {
        self.submissions.get(&id).map(|v| v.clone())
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }
}

pub struct TestBackend {
    pub addr: SocketAddr,
    pub backend: Arc<MockBackend>,
}

impl TestBackend {
    pub fn config(&self) -> Config {
        let url = format!("http://{}", self.addr).parse().unwrap();
        Config::for_base_url(url)
    }
}

/// A stored record with every field filled in.
pub fn sample(id: i64, firm: &str, date: &str) -> Value {
    json!({
        "id": id,
        "submission_date": date,
        "recruiter_firm": firm,
        "client_name": "Acme Corp",
        "recruiter_name": "Jane Roe",
        "recruiter_contact": "jane@example.com 555-123-4567",
        "position": "Backend Engineer",
        "rate": "85/hr",
        "job_id": format!("JOB{id}"),
        "interview_date": null,
        "follow_up_date": null,
        "notes": null,
    })
}

/// Spawn a mock backend seeded with `seed`, on a random port.
pub async fn spawn_backend(seed: Vec<Value>) -> TestBackend {
    let submissions = DashMap::new();
    let mut max_id = 0;
    for record in seed {
        let id = record["id"].as_i64().unwrap();
        max_id = max_id.max(id);
        submissions.insert(id, record);
    }

    let backend = Arc::new(MockBackend {
        submissions,
        next_id: AtomicI64::new(max_id + 1),
        csrf_hits: AtomicUsize::new(0),
        search_hits: AtomicUsize::new(0),
        queries: Mutex::new(Vec::new()),
        posts: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/get_csrf_token", get(csrf_token))
        .route("/search", get(search))
        .route("/add", post(add))
        .route("/edit/{id}", post(edit))
        .route("/delete/{id}", post(delete))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestBackend { addr, backend }
}

/// Build client state against the backend with a recording page.
pub fn client(backend: &TestBackend, page: Arc<RecordingPage>) -> SharedState {
    client_with(backend.config(), page)
}

pub fn client_with(config: Config, page: Arc<RecordingPage>) -> SharedState {
    resume_tracker::build_state(config, page).expect("Failed to build client state")
}

// ── Handlers ────────────────────────────────────────────────────

async fn csrf_token(State(backend): State<Arc<MockBackend>>) -> Json<Value> {
    backend.csrf_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "csrf_token": TEST_TOKEN }))
}

async fn search(
    State(backend): State<Arc<MockBackend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.search_hits.fetch_add(1, Ordering::SeqCst);
    let query = params.get("query").cloned().unwrap_or_default();
    backend.queries.lock().unwrap().push(query.clone());

    if query.contains(SLOW_QUERY) {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    let needle = query.to_lowercase();
    let mut found: Vec<Value> = backend
        .submissions
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|record| {
            [
                "recruiter_firm",
                "client_name",
                "recruiter_name",
                "recruiter_contact",
                "job_id",
                "position",
                "rate",
            ]
            .iter()
            .any(|field| {
                record[*field]
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b["submission_date"]
            .as_str()
            .cmp(&a["submission_date"].as_str())
    });
    Json(Value::Array(found))
}

async fn add(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let fields = match accept_post(&backend, "/add".to_string(), &headers, body).await {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };
    if let Err(rejection) = require_fields(&fields) {
        return rejection;
    }

    let id = backend.next_id.fetch_add(1, Ordering::SeqCst);
    let record = to_record(id, &fields);
    backend.submissions.insert(id, record.clone());
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "data": record })),
    )
}

async fn edit(
    State(backend): State<Arc<MockBackend>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let fields = match accept_post(&backend, format!("/edit/{id}"), &headers, body).await {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };
    if let Err(rejection) = require_fields(&fields) {
        return rejection;
    }
    if !backend.submissions.contains_key(&id) {
        return error(StatusCode::NOT_FOUND, "Submission not found");
    }

    let record = to_record(id, &fields);
    backend.submissions.insert(id, record.clone());
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "data": record })),
    )
}

async fn delete(
    State(backend): State<Arc<MockBackend>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    if let Err(rejection) = accept_post(&backend, format!("/delete/{id}"), &headers, body).await {
        return rejection;
    }
    if backend.submissions.remove(&id).is_none() {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to delete submission. Please try again.",
        );
    }
    (StatusCode::OK, Json(json!({ "status": "success" })))
}

// ── Helpers ─────────────────────────────────────────────────────

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "status": "error", "message": message })))
}

/// Record the POST, check its CSRF header and parse the multipart body.
async fn accept_post(
    backend: &MockBackend,
    path: String,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Map<String, Value>, (StatusCode, Json<Value>)> {
    let csrf = headers
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let fields = parse_multipart(headers, body)
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, &e))?;

    backend.posts.lock().unwrap().push(RecordedPost {
        path,
        csrf: csrf.clone(),
        fields: fields.clone(),
    });

    if csrf.as_deref() != Some(TEST_TOKEN) {
        return Err(error(StatusCode::BAD_REQUEST, "The CSRF token is missing."));
    }
    Ok(fields)
}

fn require_fields(fields: &Map<String, Value>) -> Result<(), (StatusCode, Json<Value>)> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|name| fields.get(*name).and_then(|v| v.as_str()).unwrap_or("").is_empty())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(error(
            StatusCode::BAD_REQUEST,
            &format!("Missing required fields: {}", missing.join(", ")),
        ))
    }
}

fn to_record(id: i64, fields: &Map<String, Value>) -> Value {
    let optional = |name: &str| match fields.get(name).and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => Value::String(s.to_string()),
        _ => Value::Null,
    };
    let mut record = fields.clone();
    record.insert("id".to_string(), json!(id));
    for name in ["rate", "interview_date", "follow_up_date", "notes"] {
        record.insert(name.to_string(), optional(name));
    }
    Value::Object(record)
}

/// Parse multipart form data using multer. A form with no parts may arrive
/// as an empty body; that is an empty field map.
async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<Map<String, Value>, String> {
    if body.is_empty() {
        return Ok(Map::new());
    }

    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(map)
}

// ── Recording page ──────────────────────────────────────────────

/// A `Page` that remembers everything the client did to it.
pub struct RecordingPage {
    pub tables: Mutex<Vec<RenderedTable>>,
    pub alerts: Mutex<Vec<String>>,
    pub confirms: Mutex<Vec<String>>,
    pub titles: Mutex<Vec<String>>,
    pub modal_hides: AtomicUsize,
    confirm_answer: AtomicBool,
}

impl RecordingPage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tables: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            titles: Mutex::new(Vec::new()),
            modal_hides: AtomicUsize::new(0),
            confirm_answer: AtomicBool::new(true),
        })
    }

    pub fn answer_confirms(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn table_count(&self) -> usize {
        self.tables.lock().unwrap().len()
    }

    pub fn last_table(&self) -> Option<RenderedTable> {
        self.tables.lock().unwrap().last().cloned()
    }

    pub fn last_title(&self) -> Option<String> {
        self.titles.lock().unwrap().last().cloned()
    }
}

impl Page for RecordingPage {
    fn replace_table(&self, table: &RenderedTable) {
        self.tables.lock().unwrap().push(table.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.confirm_answer.load(Ordering::SeqCst)
    }

    fn hide_modal(&self) {
        self.modal_hides.fetch_add(1, Ordering::SeqCst);
    }

    fn set_modal_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }
}
