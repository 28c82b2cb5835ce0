//! Authorization session: the one-shot code-for-token exchange that
//! precedes daemon start.

use rspotify::{AuthCodeSpotify, Config, Credentials, OAuth, prelude::*};
use tokio::sync::Mutex;

use crate::error::{Error, Result};

pub const SCOPES: &str = "user-read-playback-state user-modify-playback-state";

/// Holds the auth-code client through its two-phase lifecycle: construct
/// with no token, then exchange an authorization code exactly once. The
/// token is never refreshed afterwards.
pub struct AuthSession {
    client: AuthCodeSpotify,
    code: Mutex<Option<String>>,
}

impl AuthSession {
    /// Build a session with a null token. Nothing is fetched here; the
    /// token exists only after [`Self::exchange_code_for_token`] succeeds.
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        let creds = Credentials::new(client_id, client_secret);
        let oauth = OAuth {
            redirect_uri: redirect_uri.to_string(),
            scopes: SCOPES.split_whitespace().map(str::to_string).collect(),
            ..Default::default()
        };
        let client = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );

        Self {
            client,
            code: Mutex::new(None),
        }
    }

    /// URL the operator opens in a browser to authorize the agent.
    pub fn authorize_url(&self) -> Result<String> {
        self.client
            .get_authorize_url(false)
            .map_err(|e| Error::Authorization(e.to_string()))
    }

    /// Accept the code delivered by the callback listener.
    pub async fn set_authorization_code(&self, code: String) {
        tracing::debug!("Authorization code received");
        *self.code.lock().await = Some(code);
    }

    /// Exchange the stored code for an access token. Failure here is fatal
    /// to startup: the daemon must not run without a valid token.
    pub async fn exchange_code_for_token(&self) -> Result<()> {
        let code = self
            .code
            .lock()
            .await
            .clone()
            .ok_or_else(|| Error::Authorization("no authorization code set".into()))?;

        self.client
            .request_token(&code)
            .await
            .map_err(|e| Error::Authorization(e.to_string()))?;

        if let Some(token) = self.client.token.lock().await.unwrap().as_ref() {
            let remaining = token.expires_at.map(|at| at - chrono::Utc::now());
            tracing::info!(
                valid_for_secs = remaining.map(|r| r.num_seconds()),
                "Access token obtained; it will not be refreshed"
            );
        }

        Ok(())
    }

    pub async fn has_token(&self) -> bool {
        self.client.token.lock().await.unwrap().is_some()
    }

    /// Hand the authorized client to the service layer.
    pub fn into_client(self) -> AuthCodeSpotify {
        self.client
    }
}
