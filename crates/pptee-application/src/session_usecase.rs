//! Session use case: login, logout and navigation gating.

use std::sync::Arc;
use std::time::Duration;

use pptee_core::capability::CapabilityRepository;
use pptee_core::error::{PpteeError, Result};
use pptee_core::session::{Access, Screen, Session, SessionRepository};

/// Owns the session lifecycle.
///
/// Login performs no real authentication: any non-empty credentials are
/// accepted after a fixed delay.
#[derive(Clone)]
pub struct SessionUseCase {
    session_repository: Arc<dyn SessionRepository>,
    capability_repository: Arc<dyn CapabilityRepository>,
    login_delay: Duration,
}

impl SessionUseCase {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        capability_repository: Arc<dyn CapabilityRepository>,
        login_delay: Duration,
    ) -> Self {
        Self {
            session_repository,
            capability_repository,
            login_delay,
        }
    }

    /// The persisted session, normalised.
    pub async fn status(&self) -> Result<Session> {
        self.session_repository.load().await
    }

    /// Logs in with any non-empty email and password.
    ///
    /// Logging in again while already logged in keeps the environment flag.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(PpteeError::validation("email must not be empty"));
        }
        if password.is_empty() {
            return Err(PpteeError::validation("password must not be empty"));
        }

        tokio::time::sleep(self.login_delay).await;

        let mut session = self.session_repository.load().await?;
        session.login();
        self.session_repository.save(session).await?;
        tracing::info!("[Session] Logged in as {}", email.trim());
        Ok(session)
    }

    /// Clears both session flags and both stored capability results.
    pub async fn logout(&self) -> Result<Session> {
        let mut session = self.session_repository.load().await?;
        session.logout();
        self.session_repository.clear().await?;
        self.capability_repository.clear_all().await?;
        tracing::info!("[Session] Logged out");
        Ok(session)
    }

    pub async fn screen_access(&self, screen: Screen) -> Result<Access> {
        let session = self.status().await?;
        let access = screen.access(&session);
        tracing::debug!("[Session] Access to {}: {:?}", screen, access);
        Ok(access)
    }

    pub async fn require_authenticated(&self) -> Result<Session> {
        let session = self.status().await?;
        session.require_authenticated()?;
        Ok(session)
    }

    pub async fn require_environment_ready(&self) -> Result<Session> {
        let session = self.status().await?;
        session.require_environment_ready()?;
        Ok(session)
    }

    pub(crate) async fn save(&self, session: Session) -> Result<()> {
        self.session_repository.save(session).await
    }
}
