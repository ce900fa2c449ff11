//! Screen gating rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::model::Session;
use crate::error::PpteeError;

/// Screens of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Home,
    Dashboard,
    Setup,
    Models,
    Inference,
    Security,
    History,
    Settings,
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// Not logged in: go to the login screen.
    RedirectToLogin,
    /// Logged in but the TEE environment is not provisioned yet.
    RequiresSetup,
}

impl Screen {
    pub const ALL: [Screen; 9] = [
        Screen::Login,
        Screen::Home,
        Screen::Dashboard,
        Screen::Setup,
        Screen::Models,
        Screen::Inference,
        Screen::Security,
        Screen::History,
        Screen::Settings,
    ];

    pub fn requires_authentication(self) -> bool {
        !matches!(self, Screen::Login)
    }

    pub fn requires_environment(self) -> bool {
        matches!(self, Screen::Models | Screen::Inference)
    }

    /// Decides whether `session` may open this screen.
    pub fn access(self, session: &Session) -> Access {
        if self.requires_authentication() && !session.authenticated {
            return Access::RedirectToLogin;
        }
        if self.requires_environment() && !session.environment_ready {
            return Access::RequiresSetup;
        }
        Access::Granted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Home => "home",
            Screen::Dashboard => "dashboard",
            Screen::Setup => "setup",
            Screen::Models => "models",
            Screen::Inference => "inference",
            Screen::Security => "security",
            Screen::History => "history",
            Screen::Settings => "settings",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = PpteeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == wanted)
            .ok_or_else(|| PpteeError::not_found("screen", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_screen_is_always_open() {
        assert_eq!(Screen::Login.access(&Session::new()), Access::Granted);
    }

    #[test]
    fn test_protected_screens_redirect_when_logged_out() {
        let session = Session::new();
        for screen in Screen::ALL.into_iter().filter(|s| *s != Screen::Login) {
            assert_eq!(screen.access(&session), Access::RedirectToLogin, "{screen}");
        }
    }

    #[test]
    fn test_model_screens_require_setup() {
        let session = Session::from_flags(true, false);
        assert_eq!(Screen::Models.access(&session), Access::RequiresSetup);
        assert_eq!(Screen::Inference.access(&session), Access::RequiresSetup);
        assert_eq!(Screen::Setup.access(&session), Access::Granted);
        assert_eq!(Screen::History.access(&session), Access::Granted);

        let ready = Session::from_flags(true, true);
        assert_eq!(Screen::Inference.access(&ready), Access::Granted);
    }

    #[test]
    fn test_parse_screen() {
        assert_eq!("Models".parse::<Screen>().unwrap(), Screen::Models);
        assert!("nowhere".parse::<Screen>().unwrap_err().is_not_found());
    }
}
