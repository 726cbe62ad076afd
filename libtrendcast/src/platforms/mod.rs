//! Posting client abstraction
//!
//! The core never talks to the social platform directly. It drives a
//! [`PostingClient`] through login, send and logout, and treats every error the
//! client returns as an ordinary posting failure.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Credentials;

pub mod dry_run;

// Available outside tests so integration tests can script client behavior
pub mod mock;

/// An authenticated session returned by [`PostingClient::login`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub username: String,
}

#[async_trait]
pub trait PostingClient: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Authenticate with the platform
    ///
    /// # Errors
    ///
    /// `PlatformError::Authentication` for rejected credentials,
    /// `PlatformError::Network` for transport failures.
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    /// Publish `text` as a new post
    async fn send(&self, session: &Session, text: &str) -> Result<()>;

    /// End the session
    ///
    /// Callers treat this as best-effort and only log failures.
    async fn logout(&self, session: &Session) -> Result<()>;
}
