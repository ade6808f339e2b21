//! Client-side authentication session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionManager` is the single owner of the bearer token. It is created
//! once per process, shared via `Arc`, and is the only writer of the persisted
//! token entry. Request builders read [`SessionManager::token`] per call.
//!
//! DESIGN
//! ======
//! Every token mutation bumps a generation counter. An identity verification
//! is tagged with the generation it started under and only commits if that
//! generation (and token) is still current, so a late answer can never revive
//! a session that logout or a newer login already replaced.
//!
//! Mutations are ordered persisted write -> in-memory token -> navigation ->
//! notification. Every storage read and write happens under the state lock,
//! so the persisted and in-memory tokens only ever change together. The lock
//! is never held across an await; storage calls are synchronous and small.
//!
//! TRADE-OFFS
//! ==========
//! Concurrent login/register calls are not serialized: whichever response
//! arrives last decides the final session.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;
use crate::net::api::AuthApi;
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::routes::Route;
use crate::shell::{Navigator, Notice, Notifier};
use crate::storage::{Storage, TOKEN_KEY};

pub const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";
pub const LOGIN_FALLBACK: &str = "Invalid credentials. Please try again.";
pub const PERSIST_FAILED: &str = "Could not save your session. Please try again.";
pub const REGISTER_SUCCESS: &str = "Registration successful!";
pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const LOGOUT_NOTICE: &str = "You have been logged out.";

// =============================================================================
// STATUS
// =============================================================================

/// Derived session status.
///
/// Without a token the status is always `Bootstrapping` (startup not settled)
/// or `Anonymous`. Failed and outstanding credential requests are reported by
/// [`SessionManager::last_error`] and [`SessionManager::is_submitting`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup has not settled, or a persisted token is still being verified.
    Bootstrapping,
    Anonymous,
    /// A login or register request is in flight while a session is held.
    Authenticating,
    Authenticated,
    /// A token is held but its identity is unresolved and no check is outstanding.
    Error,
}

/// Result of a login or register call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Failure { message: String },
}

impl AuthOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message } => Some(message),
        }
    }
}

/// Point-in-time view of the session for routing decisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub token_present: bool,
    pub status: SessionStatus,
    pub identity: Option<User>,
    /// The held token is still being checked against the server.
    pub verification_pending: bool,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Default)]
struct SessionInner {
    token: Option<String>,
    identity: Option<User>,
    /// Bumped on every token change.
    generation: u64,
    /// Generation of the outstanding identity verification, if any.
    verifying: Option<u64>,
    /// Outstanding login/register requests.
    in_flight: usize,
    /// Set once startup reconciliation or any credential operation settles.
    settled: bool,
    last_error: Option<String>,
}

impl SessionInner {
    fn status(&self) -> SessionStatus {
        if self.token.is_none() {
            return if self.settled { SessionStatus::Anonymous } else { SessionStatus::Bootstrapping };
        }
        if self.verification_pending() {
            return SessionStatus::Bootstrapping;
        }
        if self.in_flight > 0 {
            return SessionStatus::Authenticating;
        }
        match self.identity {
            Some(_) => SessionStatus::Authenticated,
            None => SessionStatus::Error,
        }
    }

    fn verification_pending(&self) -> bool {
        self.verifying == Some(self.generation)
    }

    fn replace_token(&mut self, token: Option<String>, identity: Option<User>) {
        self.generation += 1;
        self.token = token;
        self.identity = identity;
    }
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<SessionInner>,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { api, storage, navigator, notifier, inner: Mutex::new(SessionInner::default()) }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// True iff a token is held. This is credential presence, not verification;
    /// check [`SessionManager::status`] for a server-confirmed identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().token.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.lock().status()
    }

    #[must_use]
    pub fn identity(&self) -> Option<User> {
        self.lock().identity.clone()
    }

    /// Current bearer token, read fresh for each outbound request.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Message from the last failed login/register, cleared by any later success or logout.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let inner = self.lock();
        SessionView {
            token_present: inner.token.is_some(),
            status: inner.status(),
            identity: inner.identity.clone(),
            verification_pending: inner.token.is_some() && inner.verification_pending(),
        }
    }

    /// True while a login or register request is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.lock().in_flight > 0
    }

    // -------------------------------------------------------------------------
    // Bootstrap
    // -------------------------------------------------------------------------

    /// Reconcile the persisted token with the server.
    ///
    /// No persisted token settles as anonymous without any network call. A
    /// persisted token is verified via the API; rejection or any transport
    /// failure tears the session down exactly like [`SessionManager::logout`].
    /// Calls that overlap an outstanding verification of the same token
    /// return immediately instead of issuing a second request.
    pub async fn bootstrap(&self) -> SessionStatus {
        let (generation, token) = {
            let mut inner = self.lock();
            let persisted = match self.storage.get(TOKEN_KEY) {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "persisted session unreadable, starting anonymous");
                    None
                }
            };
            let Some(token) = persisted else {
                if inner.token.is_some() {
                    inner.replace_token(None, None);
                }
                inner.settled = true;
                tracing::debug!("no persisted session");
                return inner.status();
            };
            if inner.token.as_deref() != Some(token.as_str()) {
                inner.replace_token(Some(token.clone()), None);
            }
            if inner.verification_pending() {
                tracing::debug!(generation = inner.generation, "identity verification already in flight");
                return inner.status();
            }
            inner.verifying = Some(inner.generation);
            (inner.generation, token)
        };

        tracing::debug!(generation, "verifying persisted session");
        let result = self.api.fetch_user(&token).await;

        let mut inner = self.lock();
        if inner.verifying == Some(generation) {
            inner.verifying = None;
        }
        if inner.generation != generation || inner.token.as_deref() != Some(token.as_str()) {
            tracing::debug!(generation, current = inner.generation, "discarding stale identity verification");
            return inner.status();
        }

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                inner.identity = Some(user);
                inner.settled = true;
                inner.status()
            }
            Err(e) => {
                drop(inner);
                tracing::warn!(error = %e, "persisted session rejected, signing out");
                if self.teardown(Some(generation)) {
                    self.announce_logout();
                }
                self.status()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------

    /// Create an account and sign in with it.
    pub async fn register(&self, request: RegisterRequest) -> AuthOutcome {
        let api = Arc::clone(&self.api);
        let current = self.token();
        self.authenticate(
            "register",
            async move { api.register(&request, current.as_deref()).await },
            REGISTER_FALLBACK,
            REGISTER_SUCCESS,
        )
        .await
    }

    /// Sign in with email and password.
    pub async fn login(&self, request: LoginRequest) -> AuthOutcome {
        let api = Arc::clone(&self.api);
        let current = self.token();
        self.authenticate("login", async move { api.login(&request, current.as_deref()).await }, LOGIN_FALLBACK, LOGIN_SUCCESS)
            .await
    }

    async fn authenticate<F>(&self, op: &'static str, call: F, fallback: &str, success: &str) -> AuthOutcome
    where
        F: Future<Output = Result<AuthResponse, ApiError>>,
    {
        let guard = InFlight::enter(self);
        let result = call.await;

        let committed = {
            let mut inner = self.lock();
            inner.settled = true;
            match result {
                Ok(response) => match self.storage.set(TOKEN_KEY, &response.token) {
                    Ok(()) => {
                        inner.replace_token(Some(response.token), Some(response.user.clone()));
                        inner.last_error = None;
                        Ok(response.user)
                    }
                    Err(e) => {
                        tracing::error!(op, error = %e, "failed to persist session token");
                        inner.last_error = Some(PERSIST_FAILED.to_owned());
                        Err(PERSIST_FAILED.to_owned())
                    }
                },
                Err(e) => {
                    tracing::warn!(op, error = %e, "credential request failed");
                    let message = e.user_message(fallback);
                    inner.last_error = Some(message.clone());
                    Err(message)
                }
            }
        };
        drop(guard);

        match committed {
            Ok(user) => {
                tracing::info!(op, user_id = %user.id, "signed in");
                self.navigator.navigate(Route::Dashboard);
                self.notifier.notify(Notice::success(success));
                AuthOutcome::Success
            }
            Err(message) => AuthOutcome::Failure { message },
        }
    }

    // -------------------------------------------------------------------------
    // Logout
    // -------------------------------------------------------------------------

    /// Clear the session locally. Never fails and is safe when already signed out.
    pub fn logout(&self) {
        self.teardown(None);
        tracing::info!("signed out");
        self.announce_logout();
    }

    /// Clear persisted and in-memory credentials. With `expected` set, only
    /// proceeds if that generation is still current; returns whether it ran.
    fn teardown(&self, expected: Option<u64>) -> bool {
        let mut inner = self.lock();
        if let Some(generation) = expected
            && inner.generation != generation
        {
            return false;
        }
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            tracing::error!(error = %e, "failed to clear persisted session token");
        }
        if inner.token.is_some() || inner.identity.is_some() {
            inner.replace_token(None, None);
        }
        inner.last_error = None;
        inner.settled = true;
        true
    }

    fn announce_logout(&self) {
        self.navigator.navigate(Route::Home);
        self.notifier.notify(Notice::info(LOGOUT_NOTICE));
    }
}

/// Counts an outstanding credential request for as long as it lives, so a
/// dropped future cannot leave the session stuck in `Authenticating`.
struct InFlight<'a> {
    session: &'a SessionManager,
}

impl<'a> InFlight<'a> {
    fn enter(session: &'a SessionManager) -> Self {
        session.lock().in_flight += 1;
        Self { session }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
