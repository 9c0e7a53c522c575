//! RestGateway wire behavior against a local mock of the table endpoint:
//! auth headers, representation returns, zero-affected-row rejections, and
//! error-body message extraction.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};

use taskdeck::config::AppConfig;
use taskdeck::gateway::{RemoteError, RestGateway, TaskGateway};
use taskdeck::task::{CreateTaskInput, Task, TaskStatus, UpdateTaskInput};

// ─── Mock table server ───────────────────────────────────────────────────────

struct MockTable {
    rows: Mutex<Vec<Task>>,
    clock: AtomicI64,
    epoch: DateTime<Utc>,
    last_headers: Mutex<Option<HeaderMap>>,
}

impl MockTable {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            clock: AtomicI64::new(0),
            epoch: Utc::now(),
            last_headers: Mutex::new(None),
        })
    }

    fn now(&self) -> DateTime<Utc> {
        self.epoch + Duration::seconds(self.clock.fetch_add(1, Ordering::SeqCst))
    }

    fn remember_headers(&self, headers: HeaderMap) {
        *self.last_headers.lock().unwrap() = Some(headers);
    }

    fn header(&self, name: &str) -> Option<String> {
        self.last_headers
            .lock()
            .unwrap()
            .as_ref()?
            .get(name)?
            .to_str()
            .ok()
            .map(str::to_owned)
    }
}

/// `id=eq.<value>` → `<value>`
fn eq_filter(params: &HashMap<String, String>) -> Option<&str> {
    params.get("id")?.strip_prefix("eq.")
}

async fn list_rows(
    State(table): State<Arc<MockTable>>,
    headers: HeaderMap,
) -> Json<Vec<Task>> {
    table.remember_headers(headers);
    let mut rows = table.rows.lock().unwrap().clone();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(rows)
}

async fn insert_row(
    State(table): State<Arc<MockTable>>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<Vec<Task>>) {
    let now = table.now();
    let task = Task {
        id: uuid::Uuid::new_v4().to_string(),
        title: body["title"].as_str().unwrap_or_default().to_owned(),
        description: body["description"].as_str().map(str::to_owned),
        status: serde_json::from_value(body["status"].clone()).unwrap_or(TaskStatus::Pending),
        created_at: now,
        updated_at: now,
    };
    table.rows.lock().unwrap().push(task.clone());
    (StatusCode::CREATED, Json(vec![task]))
}

async fn patch_rows(
    State(table): State<Arc<MockTable>>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<serde_json::Value>,
) -> Json<Vec<Task>> {
    let id = eq_filter(&params).unwrap_or_default().to_owned();
    let now = table.now();
    let mut rows = table.rows.lock().unwrap();
    let mut affected = Vec::new();
    for task in rows.iter_mut().filter(|t| t.id == id) {
        if let Some(title) = patch.get("title") {
            task.title = title.as_str().unwrap_or_default().to_owned();
        }
        if let Some(description) = patch.get("description") {
            task.description = description.as_str().map(str::to_owned);
        }
        if let Some(status) = patch.get("status") {
            task.status = serde_json::from_value(status.clone()).unwrap_or(task.status);
        }
        task.updated_at = now;
        affected.push(task.clone());
    }
    Json(affected)
}

async fn delete_rows(
    State(table): State<Arc<MockTable>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Task>> {
    let id = eq_filter(&params).unwrap_or_default().to_owned();
    let mut rows = table.rows.lock().unwrap();
    let affected: Vec<Task> = rows.iter().filter(|t| t.id == id).cloned().collect();
    rows.retain(|t| t.id != id);
    Json(affected)
}

async fn start_mock(table: Arc<MockTable>) -> SocketAddr {
    let router = Router::new()
        .route(
            "/rest/v1/tasks",
            get(list_rows)
                .post(insert_row)
                .patch(patch_rows)
                .delete(delete_rows),
        )
        .with_state(table);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A server whose every table operation fails with a JSON error body.
async fn start_failing_mock() -> SocketAddr {
    async fn boom() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "relation \"tasks\" is on fire"})),
        )
    }
    let router = Router::new().route(
        "/rest/v1/tasks",
        get(boom).post(boom).patch(boom).delete(boom),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn gateway_for(addr: SocketAddr) -> RestGateway {
    let config = AppConfig {
        base_url: format!("http://{addr}"),
        api_key: "test-key".into(),
        table: "tasks".into(),
        request_timeout_secs: 5,
        data_dir: PathBuf::new(),
    };
    RestGateway::new(&config).expect("build gateway")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

/// Every request carries the apikey and bearer headers; list comes back
/// newest-first.
#[tokio::test]
async fn list_sends_auth_and_orders_desc() {
    let table = MockTable::new();
    let addr = start_mock(table.clone()).await;
    let gateway = gateway_for(addr);

    for title in ["first", "second"] {
        gateway
            .create(CreateTaskInput::new(title))
            .await
            .expect("create");
    }

    let tasks = gateway.list().await.expect("list");
    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["second", "first"]);

    assert_eq!(table.header("apikey").as_deref(), Some("test-key"));
    assert_eq!(
        table.header("authorization").as_deref(),
        Some("Bearer test-key")
    );
}

/// Create trims on the way out and decodes the single returned row.
#[tokio::test]
async fn create_round_trips_trimmed_row() {
    let table = MockTable::new();
    let addr = start_mock(table).await;
    let gateway = gateway_for(addr);

    let task = gateway
        .create(CreateTaskInput::new("  Buy milk  ").with_description("  from the shop "))
        .await
        .expect("create");

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description.as_deref(), Some("from the shop"));
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(!task.id.is_empty());
}

/// Patch touches only the supplied fields and advances updated_at.
#[tokio::test]
async fn update_patches_supplied_fields_only() {
    let table = MockTable::new();
    let addr = start_mock(table).await;
    let gateway = gateway_for(addr);

    let created = gateway
        .create(CreateTaskInput::new("Write report").with_description("numbers"))
        .await
        .expect("create");

    let updated = gateway
        .update(&created.id, UpdateTaskInput::status(TaskStatus::Completed))
        .await
        .expect("update");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Write report");
    assert_eq!(updated.description.as_deref(), Some("numbers"));
    assert_eq!(updated.status, TaskStatus::Completed);
    assert!(updated.updated_at > created.updated_at);
}

/// Zero affected rows on update/delete is a rejection with a task-not-found
/// message, even though the transport-level response is a success.
#[tokio::test]
async fn zero_affected_rows_is_rejected() {
    let table = MockTable::new();
    let addr = start_mock(table).await;
    let gateway = gateway_for(addr);

    let err = gateway
        .update("ghost", UpdateTaskInput::status(TaskStatus::Completed))
        .await
        .expect_err("update must fail");
    assert!(err.to_string().contains("task not found: ghost"));

    let err = gateway.delete("ghost").await.expect_err("delete must fail");
    assert!(err.to_string().contains("task not found: ghost"));
}

/// Delete of an existing row succeeds exactly once.
#[tokio::test]
async fn delete_succeeds_once() {
    let table = MockTable::new();
    let addr = start_mock(table).await;
    let gateway = gateway_for(addr);

    let created = gateway
        .create(CreateTaskInput::new("Write report"))
        .await
        .expect("create");

    gateway.delete(&created.id).await.expect("delete");
    assert!(gateway.list().await.expect("list").is_empty());
    assert!(gateway.delete(&created.id).await.is_err());
}

/// The message field of a JSON error body becomes the RemoteError text the
/// UI shows verbatim.
#[tokio::test]
async fn error_body_message_is_surfaced() {
    let addr = start_failing_mock().await;
    let gateway = gateway_for(addr);

    let err = gateway.list().await.expect_err("must fail");
    match &err {
        RemoteError::Rejected { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "relation \"tasks\" is on fire");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(err.to_string(), "relation \"tasks\" is on fire");
}

/// A connection that never opens surfaces as a transport error, not a
/// panic or a hang (the client has a request timeout).
#[tokio::test]
async fn unreachable_store_is_transport_error() {
    // Bind and immediately drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let gateway = gateway_for(addr);
    let err = gateway.list().await.expect_err("must fail");
    assert!(matches!(err, RemoteError::Transport(_)));
}
