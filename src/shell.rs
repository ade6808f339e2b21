//! Router and notification collaborators driven by the session manager.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session manager never renders anything itself. It tells a
//! [`Navigator`] where to go and a [`Notifier`] what to announce; the view
//! layer (or the CLI) decides how that looks.

use crate::routes::Route;

/// Navigates on command.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Shows transient user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

// =============================================================================
// CONSOLE SHELL
// =============================================================================

/// Terminal shell: navigation is logged, notices go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleShell;

impl Navigator for ConsoleShell {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigate");
    }
}

impl Notifier for ConsoleShell {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}
