//! Authentication boundary.
//!
//! Session bootstrap, redirects, and credential handling all belong to the
//! host environment. The core needs exactly two things from it: whether a
//! user is signed in, and a way to end the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AuthSession: Send + Sync {
    /// Whether a user is currently signed in.
    fn is_authenticated(&self) -> bool;

    /// End the current session.
    async fn log_out(&self) -> Result<()>;
}

/// Fixed-state session for tests and single-user embedding.
#[derive(Clone, Default)]
pub struct StaticSession {
    authenticated: Arc<AtomicBool>,
}

impl StaticSession {
    pub fn signed_in() -> Self {
        let session = Self::default();
        session.authenticated.store(true, Ordering::Relaxed);
        session
    }
}

#[async_trait]
impl AuthSession for StaticSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }

    async fn log_out(&self) -> Result<()> {
        self.authenticated.store(false, Ordering::Relaxed);
        Ok(())
    }
}
