//! Session domain model.

use serde::{Deserialize, Serialize};

use crate::error::{PpteeError, Result};

/// Lifecycle phase derived from the session flags.
///
/// `Idle -> LoggedIn -> EnvReady`; logout returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    LoggedIn,
    EnvReady,
}

/// The application session: whether the user is logged in and whether the
/// TEE environment has been provisioned.
///
/// There is a single writer (the front end) and the flags are persisted on
/// every change. `environment_ready` is never true while `authenticated` is
/// false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub authenticated: bool,
    pub environment_ready: bool,
}

impl Session {
    /// Creates a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a session from persisted flags.
    ///
    /// An environment flag without an auth flag is dropped.
    pub fn from_flags(authenticated: bool, environment_ready: bool) -> Self {
        Self {
            authenticated,
            environment_ready: authenticated && environment_ready,
        }
    }

    pub fn login(&mut self) {
        self.authenticated = true;
    }

    /// Clears both flags. Logging back in starts from `LoggedIn`, never `EnvReady`.
    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// Marks the TEE environment as provisioned.
    ///
    /// # Errors
    ///
    /// Returns `PpteeError::Unauthenticated` if nobody is logged in.
    pub fn mark_environment_ready(&mut self) -> Result<()> {
        self.require_authenticated()?;
        self.environment_ready = true;
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.authenticated, self.environment_ready) {
            (false, _) => SessionPhase::Idle,
            (true, false) => SessionPhase::LoggedIn,
            (true, true) => SessionPhase::EnvReady,
        }
    }

    pub fn require_authenticated(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(PpteeError::Unauthenticated)
        }
    }

    /// Requires a logged-in session with a provisioned environment.
    pub fn require_environment_ready(&self) -> Result<()> {
        self.require_authenticated()?;
        if self.environment_ready {
            Ok(())
        } else {
            Err(PpteeError::EnvironmentNotReady)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.require_authenticated(), Err(PpteeError::Unauthenticated));
    }

    #[test]
    fn test_login_then_environment_ready() {
        let mut session = Session::new();
        session.login();
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
        assert_eq!(
            session.require_environment_ready(),
            Err(PpteeError::EnvironmentNotReady)
        );

        session.mark_environment_ready().unwrap();
        assert_eq!(session.phase(), SessionPhase::EnvReady);
        assert!(session.require_environment_ready().is_ok());
    }

    #[test]
    fn test_environment_ready_requires_login() {
        let mut session = Session::new();
        assert_eq!(
            session.mark_environment_ready(),
            Err(PpteeError::Unauthenticated)
        );
        assert!(!session.environment_ready);
    }

    #[test]
    fn test_logout_clears_both_flags() {
        let mut session = Session::new();
        session.login();
        session.mark_environment_ready().unwrap();

        session.logout();
        assert_eq!(session, Session::default());

        // Logging back in does not bring the environment back.
        session.login();
        assert_eq!(session.phase(), SessionPhase::LoggedIn);
    }

    #[test]
    fn test_from_flags_drops_orphan_environment_flag() {
        let session = Session::from_flags(false, true);
        assert!(!session.environment_ready);
        assert_eq!(session.phase(), SessionPhase::Idle);

        let session = Session::from_flags(true, true);
        assert_eq!(session.phase(), SessionPhase::EnvReady);
    }
}
