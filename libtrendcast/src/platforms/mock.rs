//! Mock posting client for testing
//!
//! Each step (login, send, logout) can be told to fail or to stall, and the
//! client records what it was asked to do. Clones share the same counters, so
//! a test can keep one handle and give another to the code under test.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use super::{PostingClient, Session};
use crate::error::{PlatformError, Result};
use crate::types::Credentials;

#[derive(Debug, Clone, Default)]
struct CallLog {
    logins: usize,
    sends: usize,
    logouts: usize,
    sent: Vec<String>,
}

/// Configuration for mock client behavior
#[derive(Debug, Clone, Default)]
pub struct MockClientConfig {
    pub login_error: Option<String>,
    pub send_error: Option<String>,
    pub logout_error: Option<String>,
    /// Applied before each step to simulate latency
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    config: MockClientConfig,
    log: Arc<Mutex<CallLog>>,
}

impl MockClient {
    pub fn new(config: MockClientConfig) -> Self {
        Self {
            config,
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Client where every step succeeds
    pub fn success() -> Self {
        Self::new(MockClientConfig::default())
    }

    pub fn login_failure(error: &str) -> Self {
        Self::new(MockClientConfig {
            login_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn send_failure(error: &str) -> Self {
        Self::new(MockClientConfig {
            send_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn logout_failure(error: &str) -> Self {
        Self::new(MockClientConfig {
            logout_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self::new(MockClientConfig {
            delay,
            ..Default::default()
        })
    }

    pub fn login_count(&self) -> usize {
        self.log.lock().unwrap().logins
    }

    pub fn send_count(&self) -> usize {
        self.log.lock().unwrap().sends
    }

    pub fn logout_count(&self) -> usize {
        self.log.lock().unwrap().logouts
    }

    /// Texts that were successfully sent, in order
    pub fn sent(&self) -> Vec<String> {
        self.log.lock().unwrap().sent.clone()
    }

    async fn pause(&self) {
        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }
    }
}

#[async_trait]
impl PostingClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.log.lock().unwrap().logins += 1;
        self.pause().await;

        if let Some(error) = &self.config.login_error {
            return Err(PlatformError::Authentication(error.clone()).into());
        }

        Ok(Session {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            username: credentials.username.clone().unwrap_or_default(),
        })
    }

    async fn send(&self, _session: &Session, text: &str) -> Result<()> {
        self.log.lock().unwrap().sends += 1;
        self.pause().await;

        if let Some(error) = &self.config.send_error {
            return Err(PlatformError::Posting(error.clone()).into());
        }

        self.log.lock().unwrap().sent.push(text.to_string());
        Ok(())
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.log.lock().unwrap().logouts += 1;
        self.pause().await;

        match &self.config.logout_error {
            Some(error) => Err(PlatformError::Network(error.clone()).into()),
            None => Ok(()),
        }
    }
}
