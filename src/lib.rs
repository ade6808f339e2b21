//! Client session core for the job-tracker API.
//!
//! ARCHITECTURE
//! ============
//! [`session::SessionManager`] owns the bearer token and the resolved
//! identity. It is built once per process around four collaborators: the
//! [`net::api::AuthApi`] credential endpoints, persistent
//! [`storage::Storage`], and the [`shell::Navigator`] / [`shell::Notifier`]
//! pair standing in for the view layer. [`gate::AccessGate`] turns a session
//! view into a render/redirect decision and [`resources::ResourceClient`]
//! issues authenticated calls with the token read fresh per request.

pub mod config;
pub mod error;
pub mod gate;
pub mod net;
pub mod resources;
pub mod routes;
pub mod session;
pub mod shell;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, StorageError};
pub use gate::{AccessGate, GateDecision, GatePolicy};
pub use routes::Route;
pub use session::{AuthOutcome, SessionManager, SessionStatus, SessionView};
