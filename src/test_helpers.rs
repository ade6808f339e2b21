//! Shared fakes and fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::{ApiError, StorageError};
use crate::net::api::AuthApi;
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::routes::Route;
use crate::session::SessionManager;
use crate::shell::{Navigator, Notice, Notifier};
use crate::storage::{MemoryStore, Storage, TOKEN_KEY};

pub type EventLog = Arc<Mutex<Vec<String>>>;

// =============================================================================
// FIXTURES
// =============================================================================

#[must_use]
pub fn user(id: &str, name: &str, email: &str) -> User {
    User { id: id.into(), name: name.into(), email: email.into(), created_at: None }
}

#[must_use]
pub fn auth_response(token: &str, user: User) -> AuthResponse {
    AuthResponse { token: token.into(), user }
}

#[must_use]
pub fn login_request(email: &str) -> LoginRequest {
    LoginRequest { email: email.into(), password: "x".into() }
}

#[must_use]
pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest { name: name.into(), email: email.into(), password: "secret".into() }
}

#[must_use]
pub fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status { status, message: Some(message.into()) }
}

// =============================================================================
// SCRIPTED AUTH API
// =============================================================================

/// One scripted reply, optionally held until the test releases it.
pub struct Scripted<T> {
    result: Result<T, ApiError>,
    hold: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self { result: Ok(value), hold: None }
    }

    pub fn err(err: ApiError) -> Self {
        Self { result: Err(err), hold: None }
    }

    /// Hold the reply until the returned sender fires (or is dropped).
    pub fn held(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.hold = Some(rx);
        (self, tx)
    }

    async fn resolve(self) -> Result<T, ApiError> {
        if let Some(hold) = self.hold {
            let _ = hold.await;
        }
        self.result
    }
}

#[derive(Default)]
pub struct FakeAuthApi {
    register: Mutex<VecDeque<Scripted<AuthResponse>>>,
    login: Mutex<VecDeque<Scripted<AuthResponse>>>,
    fetch_user: Mutex<VecDeque<Scripted<User>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeAuthApi {
    pub fn push_register(&self, reply: Scripted<AuthResponse>) {
        self.register.lock().unwrap().push_back(reply);
    }

    pub fn push_login(&self, reply: Scripted<AuthResponse>) {
        self.login.lock().unwrap().push_back(reply);
    }

    pub fn push_fetch_user(&self, reply: Scripted<User>) {
        self.fetch_user.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// `login:a@b.com`, or `login:a@b.com bearer=t1` when a token was sent.
fn credential_call(endpoint: &str, email: &str, token: Option<&str>) -> String {
    match token {
        Some(token) => format!("{endpoint}:{email} bearer={token}"),
        None => format!("{endpoint}:{email}"),
    }
}

fn unscripted<T>(endpoint: &str) -> Scripted<T> {
    Scripted::err(ApiError::Transport(format!("unscripted {endpoint} call")))
}

#[async_trait::async_trait]
impl AuthApi for FakeAuthApi {
    async fn register(&self, request: &RegisterRequest, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        self.record(credential_call("register", &request.email, token));
        let reply = self.register.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| unscripted("register")).resolve().await
    }

    async fn login(&self, request: &LoginRequest, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        self.record(credential_call("login", &request.email, token));
        let reply = self.login.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| unscripted("login")).resolve().await
    }

    async fn fetch_user(&self, token: &str) -> Result<User, ApiError> {
        self.record(format!("fetch_user:{token}"));
        let reply = self.fetch_user.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| unscripted("fetch_user")).resolve().await
    }
}

/// Yield until `api` has recorded at least `n` calls.
pub async fn wait_for_calls(api: &FakeAuthApi, n: usize) {
    for _ in 0..10_000 {
        if api.calls().len() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {n} API calls, saw {:?}", api.calls());
}

// =============================================================================
// RECORDING COLLABORATORS
// =============================================================================

/// Memory store that appends every write to a shared event log.
pub struct LoggedStore {
    inner: MemoryStore,
    log: EventLog,
    fail_writes: bool,
}

impl LoggedStore {
    pub fn new(inner: MemoryStore, log: EventLog) -> Self {
        Self { inner, log, fail_writes: false }
    }

    pub fn failing(log: EventLog) -> Self {
        Self { inner: MemoryStore::new(), log, fail_writes: true }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.get(TOKEN_KEY).unwrap()
    }

    fn write_result(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl Storage for LoggedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_result()?;
        self.log.lock().unwrap().push(format!("store:set:{key}"));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write_result()?;
        self.log.lock().unwrap().push(format!("store:remove:{key}"));
        self.inner.remove(key)
    }
}

#[derive(Default)]
pub struct RecordingShell {
    log: EventLog,
    routes: Mutex<Vec<Route>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingShell {
    pub fn new(log: EventLog) -> Self {
        Self { log, ..Self::default() }
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Navigator for RecordingShell {
    fn navigate(&self, route: Route) {
        self.log.lock().unwrap().push(format!("navigate:{route}"));
        self.routes.lock().unwrap().push(route);
    }
}

impl Notifier for RecordingShell {
    fn notify(&self, notice: Notice) {
        self.log.lock().unwrap().push(format!("notice:{}", notice.message));
        self.notices.lock().unwrap().push(notice);
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub api: Arc<FakeAuthApi>,
    pub store: Arc<LoggedStore>,
    pub shell: Arc<RecordingShell>,
    pub session: Arc<SessionManager>,
    pub log: EventLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(MemoryStore::new(), false)
    }

    /// Harness whose store already holds `token` from a previous run.
    pub fn with_token(token: &str) -> Self {
        Self::build(MemoryStore::with_token(token), false)
    }

    /// Harness whose store rejects every write.
    pub fn with_failing_store() -> Self {
        Self::build(MemoryStore::new(), true)
    }

    fn build(memory: MemoryStore, failing: bool) -> Self {
        let log: EventLog = Arc::default();
        let api = Arc::new(FakeAuthApi::default());
        let store = Arc::new(if failing {
            LoggedStore::failing(Arc::clone(&log))
        } else {
            LoggedStore::new(memory, Arc::clone(&log))
        });
        let shell = Arc::new(RecordingShell::new(Arc::clone(&log)));
        let session = Arc::new(SessionManager::new(
            api.clone(),
            store.clone(),
            shell.clone(),
            shell.clone(),
        ));
        Self { api, store, shell, session, log }
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// In-memory and persisted tokens must agree after every completed mutation.
    pub fn assert_tokens_in_sync(&self) {
        assert_eq!(self.session.token(), self.store.token(), "memory and storage diverged");
    }
}

// =============================================================================
// HTTP STUB
// =============================================================================

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
