//! Login, registration and logout.

use serde::Deserialize;
use tracing::{debug, info};

use super::{ApiClient, ApiError, PendingRequest};
use crate::models::{Credentials, MessageResponse};

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

impl ApiClient {
    /// Authenticate and store the returned token pair.
    ///
    /// Sent without refresh recovery: a 401 here means bad credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let pending = PendingRequest::post("login")
            .json(credentials)?
            .without_refresh();
        let tokens: LoginResponse = self.send_json(pending).await?;

        self.tokens()
            .set_tokens(&tokens.access_token, &tokens.refresh_token);
        info!(username = %credentials.username, "Logged in");
        Ok(())
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ApiError> {
        let pending = PendingRequest::post("register")
            .json(credentials)?
            .without_refresh();
        let response = self.send_json(pending).await?;
        info!(username = %credentials.username, "Registered");
        Ok(response)
    }

    /// Revoke the access token on the backend, then forget the session.
    ///
    /// Without a stored session there is nothing to revoke. If the backend
    /// rejects the call the tokens are kept and the error is returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if !self.is_authenticated() {
            debug!("Logout requested with no session stored");
            self.tokens().clear_tokens();
            return Ok(());
        }

        self.send_empty(PendingRequest::delete("logout")).await?;
        self.tokens().clear_tokens();
        info!("Logged out");
        Ok(())
    }
}
