// Authentication endpoints
//
// Registration, login, token liveness check, and the profile lookup.
// Login does not install the returned token; callers decide when the
// session is committed.

use secrecy::SecretString;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser, TokenStatus};
use crate::paths;

impl ApiClient {
    /// Create an account.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisteredUser, Error> {
        debug!(email = %req.email, "registering user");
        self.post(paths::REGISTER, req).await
    }

    /// Exchange credentials for a session token.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, Error> {
        debug!(email = %req.email, "logging in");
        self.post(paths::LOGIN, req).await
    }

    /// Ask the server whether `token` is still valid.
    ///
    /// `GET /auth/check-token` with the given token as bearer, regardless
    /// of the credential installed on this client.
    pub async fn check_token(&self, token: &SecretString) -> Result<TokenStatus, Error> {
        self.get_with_token(paths::CHECK_TOKEN, token).await
    }

    /// `GET /auth/user-profile`
    pub async fn user_profile(&self) -> Result<RegisteredUser, Error> {
        self.get(paths::USER_PROFILE).await
    }
}
