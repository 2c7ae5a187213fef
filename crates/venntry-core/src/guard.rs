// ── Route guard ──
//
// Decides whether a UI route may be shown. Public routes always pass;
// everything else needs a session the server still accepts.

use tracing::{debug, warn};

use crate::context::AppContext;

/// Routes reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &["/", "/home", "/login", "/register"];

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

impl RouteDecision {
    fn to_login() -> Self {
        Self::Redirect(LOGIN_PATH.to_owned())
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    ctx: AppContext,
}

impl RouteGuard {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn is_public(path: &str) -> bool {
        PUBLIC_PATHS.iter().any(|p| *p == path)
    }

    /// Check `path` against the current session.
    ///
    /// The token is verified with the server on every protected check. If
    /// the server reports it expired, or the check itself fails, the
    /// session is dropped and the visitor is sent to the login page.
    pub async fn check(&self, path: &str) -> RouteDecision {
        if Self::is_public(path) {
            return RouteDecision::Allow;
        }

        let Some(token) = self.ctx.session().token() else {
            debug!(path, "no session; redirecting to login");
            return RouteDecision::to_login();
        };

        match self.ctx.client().check_token(&token).await {
            Ok(status) if !status.expired => RouteDecision::Allow,
            Ok(_) => {
                debug!(path, "session expired");
                self.drop_session();
                RouteDecision::to_login()
            }
            Err(e) => {
                warn!(path, error = %e, "token validation failed");
                self.drop_session();
                RouteDecision::to_login()
            }
        }
    }

    fn drop_session(&self) {
        self.ctx.client().set_credential(None);
        if let Err(e) = self.ctx.session().clear() {
            warn!(error = %e, "failed to remove stored session");
        }
    }
}
