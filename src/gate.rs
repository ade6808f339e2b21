//! Access gate consulted by the router before rendering a view.
//!
//! DESIGN
//! ======
//! The gate is a pure function of the session view and the requested route.
//! Which signal it trusts is an explicit [`GatePolicy`]:
//!
//! - [`GatePolicy::TokenPresence`] decides from whether a token is held. A
//!   persisted but not yet verified token renders protected views right away
//!   on reload, and the session tears itself down later if verification fails.
//! - [`GatePolicy::VerifiedIdentity`] holds protected views at
//!   [`GateDecision::Pending`] while the session is still bootstrapping or
//!   the held token is still being verified (even if a login is in flight
//!   at the same time), and only renders once the identity is confirmed.

use crate::routes::Route;
use crate::session::{SessionStatus, SessionView};

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GatePolicy {
    #[default]
    TokenPresence,
    VerifiedIdentity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Render(Route),
    Redirect(Route),
    /// Session state is not settled yet; show a loading placeholder.
    Pending,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AccessGate {
    policy: GatePolicy,
}

impl AccessGate {
    #[must_use]
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Decide what to show for `route` given the current session.
    #[must_use]
    pub fn decide(&self, route: Route, session: &SessionView) -> GateDecision {
        match self.access(session) {
            Access::Granted if route.is_auth_page() => GateDecision::Redirect(Route::Dashboard),
            Access::Granted => GateDecision::Render(route),
            Access::Pending if route.is_protected() => GateDecision::Pending,
            Access::Denied if route.is_protected() => GateDecision::Redirect(Route::Home),
            Access::Pending | Access::Denied => GateDecision::Render(route),
        }
    }

    fn access(&self, session: &SessionView) -> Access {
        match self.policy {
            GatePolicy::TokenPresence if session.token_present => Access::Granted,
            GatePolicy::TokenPresence => Access::Denied,
            GatePolicy::VerifiedIdentity if session.token_present && session.identity.is_some() => Access::Granted,
            GatePolicy::VerifiedIdentity
                if (session.token_present && session.verification_pending)
                    || session.status == SessionStatus::Bootstrapping =>
            {
                Access::Pending
            }
            GatePolicy::VerifiedIdentity => Access::Denied,
        }
    }
}

enum Access {
    Granted,
    Pending,
    Denied,
}
