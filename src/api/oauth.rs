//! Access tokens for the service account.

use crate::api::{ServiceAccount, OAUTH_SCOPES};
use crate::error::Res;
use anyhow::Context;
use tracing::{debug, trace};
use yup_oauth2::{AccessToken, ServiceAccountAuthenticator};

/// Hands out an access token for the service account, fetching a new one when there is none yet
/// or the current one has expired.
pub(crate) struct TokenProvider {
    account: ServiceAccount,
    token: Option<AccessToken>,
}

impl TokenProvider {
    pub(crate) fn new(account: ServiceAccount) -> Self {
        Self {
            account,
            token: None,
        }
    }

    /// Returns a valid access token, signing a new JWT grant with the service account key if
    /// needed.
    pub(crate) async fn token_with_refresh(&mut self) -> Res<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_expired()) {
            if let Some(s) = token.token() {
                trace!("Reusing the cached access token");
                return Ok(s.to_string());
            }
        }

        debug!(
            "Requesting an access token for {}",
            self.account.client_email()
        );
        let auth = ServiceAccountAuthenticator::builder(self.account.key().clone())
            .build()
            .await
            .context("Failed to create the service account authenticator")?;
        let token = auth
            .token(OAUTH_SCOPES)
            .await
            .context("Failed to obtain an access token for the service account")?;
        let s = token
            .token()
            .context("The token response did not contain an access token")?
            .to_string();
        self.token = Some(token);
        Ok(s)
    }

    pub(crate) fn client_email(&self) -> &str {
        self.account.client_email()
    }
}
