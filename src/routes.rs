//! Route table shared by the router, the access gate, and the session manager.

use std::fmt;

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

/// A navigable view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public entry point; logout lands here.
    Home,
    Login,
    Register,
    /// Post-login entry point.
    Dashboard,
    Profile,
    ResumeFeedback,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Profile,
        Route::ResumeFeedback,
        Route::NotFound,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::ResumeFeedback => "/resume-feedback",
            Self::NotFound => "*",
        }
    }

    /// Resolve a path, ignoring a trailing slash and any query string.
    /// Unknown paths resolve to [`Route::NotFound`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL
            .into_iter()
            .find(|route| *route != Self::NotFound && route.path() == normalized)
            .unwrap_or(Self::NotFound)
    }

    /// Views that require a session.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile | Self::ResumeFeedback)
    }

    /// Credential entry pages, pointless once signed in.
    #[must_use]
    pub fn is_auth_page(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
