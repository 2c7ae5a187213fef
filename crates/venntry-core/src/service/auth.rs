use tracing::debug;
use venntry_api::{LoginRequest, RegisterRequest, RegisteredUser};

use crate::actions::{self, ActionResult, AuthenticatedUser};
use crate::cache::ResourceKey;
use crate::context::AppContext;
use crate::store::UserProfile;

/// Sign-up, sign-in and the stored profile.
#[derive(Debug, Clone)]
pub struct AuthService {
    ctx: AppContext,
}

impl AuthService {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.ctx.selection().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.selection().is_authenticated() && self.ctx.session().is_present()
    }

    pub async fn register(&self, req: &RegisterRequest) -> ActionResult<RegisteredUser> {
        actions::register_user(&self.ctx, req).await
    }

    /// Log in, store the profile, and select the user's first inventory.
    pub async fn login(&self, req: &LoginRequest) -> ActionResult<AuthenticatedUser> {
        let user = actions::login_user(&self.ctx, req).await?;

        // Nothing cached under the previous session is ours to show.
        self.ctx.cache().clear();

        let selection = self.ctx.selection();
        selection.set_user(UserProfile {
            id: user.user_id,
            username: user.user_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            inventories: user.inventories.clone(),
        })?;
        match user.inventories.first() {
            Some(first) => selection.set_current_inventory(first.clone())?,
            None => selection.delete_inventory()?,
        }
        Ok(user)
    }

    pub fn logout(&self) -> ActionResult<()> {
        actions::logout_user(&self.ctx)
    }

    /// Re-read the profile and inventory list from the server and replace
    /// the stored profile wholesale.
    pub async fn refresh_profile(&self) -> ActionResult<UserProfile> {
        let client = self.ctx.client();
        let (user, inventories) =
            futures_util::try_join!(client.user_profile(), client.list_inventories())?;

        let profile = UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            inventories,
        };
        self.ctx.selection().set_user(profile.clone())?;
        if let Err(e) =
            self.ctx
                .cache()
                .mutate(&ResourceKey::inventories(), &profile.inventories, false)
        {
            debug!(error = %e, "could not seed inventory list");
        }
        Ok(profile)
    }
}
