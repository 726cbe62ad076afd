//! Client that logs instead of posting
//!
//! Used by the binaries until a real platform client is plugged in: every
//! step succeeds and the composed text shows up in the logs.

use async_trait::async_trait;
use tracing::info;

use super::{PostingClient, Session};
use crate::error::{PlatformError, Result};
use crate::types::Credentials;

#[derive(Debug, Clone, Default)]
pub struct DryRunClient;

impl DryRunClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PostingClient for DryRunClient {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let username = credentials
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PlatformError::Authentication("Missing username".to_string()))?;

        info!("Dry-run login as {}", username);
        Ok(Session {
            id: uuid::Uuid::new_v4().to_string(),
            username,
        })
    }

    async fn send(&self, session: &Session, text: &str) -> Result<()> {
        info!(session = %session.id, "Dry-run sending post: {:?}", text);
        Ok(())
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        info!(session = %session.id, "Dry-run logout for {}", session.username);
        Ok(())
    }
}
