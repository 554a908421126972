use std::sync::{Arc, Mutex as StdMutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState};
use crate::repositories;
use crate::services::storage::BlobStore;
use crate::store::memory::InMemoryStore;
use crate::store::models::{Task, User};
use crate::store::types::UserRole;
use crate::store::{Item, ItemStore, Table};

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) blob: Arc<StubBlobStore>,
    _guard: OwnedMutexGuard<()>,
}

/// Settings are loaded from process-wide env vars, so tests touching
/// them are serialized.
pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("MINIMOODLE_ENV", "test");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("S3_ENDPOINT");
    std::env::remove_var("S3_ACCESS_KEY");
    std::env::remove_var("S3_SECRET_KEY");
    std::env::remove_var("S3_BUCKET_TASKS");
    std::env::remove_var("S3_REGION");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
}

pub(crate) fn set_test_storage_env() {
    std::env::set_var("S3_ENDPOINT", "http://localhost:9000");
    std::env::set_var("S3_ACCESS_KEY", "test-access-key");
    std::env::set_var("S3_SECRET_KEY", "test-secret-key");
    std::env::set_var("S3_BUCKET_TASKS", "minimoodle-test-bucket");
    std::env::set_var("S3_REGION", "us-east-1");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let store = Arc::new(InMemoryStore::new());
    let blob = Arc::new(StubBlobStore::new());

    let state =
        AppState::new(settings, store.clone(), Some(blob.clone() as Arc<dyn BlobStore>));
    let app = api::router::router(state.clone());

    TestContext { state, app, store, blob, _guard: guard }
}

/// Context with no blob collaborator wired, for exercising the
/// uploads-unavailable path.
pub(crate) async fn setup_test_context_without_storage() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let store = Arc::new(InMemoryStore::new());
    let blob = Arc::new(StubBlobStore::new());

    let state = AppState::new(settings, store.clone(), None);
    let app = api::router::router(state.clone());

    TestContext { state, app, store, blob, _guard: guard }
}

pub(crate) async fn insert_user(
    store: &dyn ItemStore,
    id: &str,
    name: &str,
    role: UserRole,
) -> User {
    let mut item = Item::new();
    item.insert("user_id".to_string(), serde_json::Value::String(id.to_string()));
    item.insert("name".to_string(), serde_json::Value::String(name.to_string()));
    item.insert("role".to_string(), serde_json::Value::String(role.as_str().to_string()));
    store.put(Table::Users, item).await.expect("insert user");

    User { id: id.to_string(), name: name.to_string(), role }
}

pub(crate) async fn insert_task(
    store: &dyn ItemStore,
    id: &str,
    subject_id: &str,
    due_at: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Task {
    let task = Task {
        id: id.to_string(),
        subject_id: subject_id.to_string(),
        title: format!("Task {id}"),
        created_at: crate::core::time::now_utc(),
        due_at,
        expires_at,
    };
    repositories::tasks::create(store, &task).await.expect("insert task");
    task
}

pub(crate) async fn enroll(store: &dyn ItemStore, user_id: &str, subject_id: &str) {
    repositories::enrollments::create(
        store,
        &crate::store::models::Enrollment {
            user_id: user_id.to_string(),
            subject_id: subject_id.to_string(),
        },
    )
    .await
    .expect("insert enrollment");
}

pub(crate) fn bearer_token(user_id: &str, role: UserRole, settings: &Settings) -> String {
    security::create_access_token(user_id, role, settings, None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(crate) async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    }
}

/// Blob collaborator double: presigns are canned URLs, deletions are
/// recorded, and either operation can be made to fail.
pub(crate) struct StubBlobStore {
    fail_presign: bool,
    fail_delete: bool,
    deleted: StdMutex<Vec<String>>,
}

impl StubBlobStore {
    pub(crate) fn new() -> Self {
        Self { fail_presign: false, fail_delete: false, deleted: StdMutex::new(Vec::new()) }
    }

    pub(crate) fn failing_presign() -> Self {
        Self { fail_presign: true, ..Self::new() }
    }

    pub(crate) fn failing_delete() -> Self {
        Self { fail_delete: true, ..Self::new() }
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("deleted lock").clone()
    }
}

#[async_trait]
impl BlobStore for StubBlobStore {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        if self.fail_presign {
            anyhow::bail!("presign backend unavailable");
        }
        Ok(format!(
            "https://blob.test/{key}?content-type={content_type}&expires={}",
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        if self.fail_delete {
            anyhow::bail!("delete backend unavailable");
        }
        self.deleted.lock().expect("deleted lock").push(key.to_string());
        Ok(())
    }
}
