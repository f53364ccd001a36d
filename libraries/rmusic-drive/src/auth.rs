//! Bearer credential sources for the drive client.

use crate::error::{DriveClientError, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Identity provider seen from the client side.
///
/// The sign-in flow lives outside this crate; the client only needs to ask
/// for a token and to report that a token stopped working.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, fetching a fresh one if needed.
    async fn access_token(&self) -> Result<String>;

    /// The last token was rejected by the API.
    async fn invalidate(&self);
}

/// Credential provider holding a single pre-issued token.
///
/// Once invalidated it has nothing left to offer, so requests fail with
/// [`DriveClientError::CredentialUnavailable`] until [`StaticCredential::set`]
/// supplies a new token.
pub struct StaticCredential {
    token: RwLock<Option<String>>,
}

impl StaticCredential {
    /// Create a provider with a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replace the stored token (e.g. after the user signs in again).
    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
        info!("Access token replaced");
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn access_token(&self) -> Result<String> {
        self.token.read().await.clone().ok_or_else(|| {
            DriveClientError::CredentialUnavailable("access token expired; sign in again".into())
        })
    }

    async fn invalidate(&self) {
        warn!("Access token rejected, discarding it");
        *self.token.write().await = None;
    }
}
