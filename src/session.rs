//! Live session tokens issued on successful handshake
//!
//! Tokens never expire within the process lifetime.

use std::collections::HashSet;

use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_HEADER: &str = "mcp-session-id";

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashSet<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token. It is visible to [`SessionStore::contains`] as
    /// soon as this returns.
    pub async fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone());
        token
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.sessions.read().await.contains(token)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
