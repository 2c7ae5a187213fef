use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use venntry_api::{Inventory, LoginRequest, LoginResponse, RegisterRequest, RegisteredUser};

use super::{ActionError, ActionResult};
use crate::context::AppContext;
use crate::session::SessionCookie;

/// What a successful login reports back: the login response minus the
/// token, which only ever lives in the session jar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub inventories: Vec<Inventory>,
}

impl From<LoginResponse> for AuthenticatedUser {
    fn from(resp: LoginResponse) -> Self {
        Self {
            user_id: resp.user_id,
            user_name: resp.user_name,
            email: resp.email,
            avatar: resp.avatar,
            inventories: resp.inventories,
        }
    }
}

/// Create an account. Never touches the session.
pub async fn register_user(
    ctx: &AppContext,
    req: &RegisterRequest,
) -> ActionResult<RegisteredUser> {
    let user = ctx.client().register(req).await?;
    info!(username = %user.username, "account registered");
    Ok(user)
}

/// Log in and commit the session.
///
/// The cookie is persisted and the token installed on the client before
/// this returns, so the caller's next request is already authenticated.
pub async fn login_user(ctx: &AppContext, req: &LoginRequest) -> ActionResult<AuthenticatedUser> {
    let resp = ctx.client().login(req).await?;
    let token = resp.token.expose_secret().to_owned();

    let cookie = SessionCookie::issue(
        SecretString::from(token.clone()),
        ctx.config().environment,
        Utc::now(),
    );
    ctx.session().store(cookie)?;
    ctx.client().set_credential(Some(SecretString::from(token)));

    info!(user = %resp.user_name, "logged in");
    Ok(AuthenticatedUser::from(resp))
}

/// Log out.
///
/// The credential is dropped first, whatever happens next. Local state
/// (selection and cache) is then cleared; the first failure there is
/// reported, but every step still runs.
pub fn logout_user(ctx: &AppContext) -> ActionResult<()> {
    ctx.client().set_credential(None);

    let mut first_err: Option<ActionError> = None;
    let steps = [
        ("session", ctx.session().clear()),
        ("auth state", ctx.selection().clear_auth()),
        ("inventory selection", ctx.selection().delete_inventory()),
    ];
    for (what, result) in steps {
        if let Err(e) = result {
            warn!(error = %e, "failed to clear {what} on logout");
            first_err.get_or_insert_with(|| e.into());
        }
    }
    ctx.cache().clear();

    info!("logged out");
    first_err.map_or(Ok(()), Err)
}
