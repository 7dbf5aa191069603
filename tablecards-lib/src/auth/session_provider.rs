//! Token provider backed by the stored session.

use async_trait::async_trait;

use super::AccessToken;
use super::TokenProvider;
use crate::error::AuthError;
use crate::session::SessionContext;

/// Reads the bearer token from the current [`Session`](crate::session::Session).
///
/// Fails with [`AuthError::NotSignedIn`] when no session is stored and with
/// [`AuthError::TokenExpired`] once the session's expiry has passed. It never
/// refreshes; signing in again is up to the caller.
#[derive(Clone)]
pub struct SessionTokenProvider {
    context: SessionContext,
}

impl SessionTokenProvider {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let session = self
            .context
            .session()
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or(AuthError::NotSignedIn)?;

        let token = match session.expires_at {
            Some(expires_at) => AccessToken::with_expiry(session.access_token, expires_at),
            None => AccessToken::new(session.access_token),
        };

        if token.is_expired() {
            return Err(AuthError::TokenExpired {
                message: format!(
                    "session of {} expired",
                    session.email.as_deref().unwrap_or("unknown user")
                ),
            });
        }

        Ok(token)
    }
}
