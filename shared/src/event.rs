use serde::{Deserialize, Serialize};

use crate::capabilities::{AuthError, Route, StoreError};
use crate::config::Config;
use crate::model::{Profile, Session, UserId};

/// A discrete user action on the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    SignOut,
    NavigateHome,
    NavigateCreate,
    NavigateProfile,
    RequestSignIn,
    ChangeTheme(String),
}

/// The single effect an intent maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    SignOut,
    Navigate(Route),
    ShowSignIn,
    ChangeTheme(String),
}

impl Intent {
    #[must_use]
    pub fn resolve(self) -> Dispatch {
        match self {
            Self::SignOut => Dispatch::SignOut,
            Self::NavigateHome => Dispatch::Navigate(Route::Home),
            Self::NavigateCreate => Dispatch::Navigate(Route::CreatePin),
            Self::NavigateProfile => Dispatch::Navigate(Route::Profile),
            Self::RequestSignIn => Dispatch::ShowSignIn,
            Self::ChangeTheme(theme) => Dispatch::ChangeTheme(theme),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SignOut => "sign_out",
            Self::NavigateHome => "navigate_home",
            Self::NavigateCreate => "navigate_create",
            Self::NavigateProfile => "navigate_profile",
            Self::RequestSignIn => "request_sign_in",
            Self::ChangeTheme(_) => "change_theme",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Shell
    Started(Config),
    SessionChanged(Session),
    SignInDismissed,
    ErrorDismissed,

    // User
    Intent(Intent),

    // Capability answers
    SessionLoaded(Result<Session, AuthError>),
    ThemesLoaded(Vec<String>),
    ProfileLoaded {
        user_id: UserId,
        /// Last theme write issued before the read.
        as_of: u64,
        result: Result<Option<Profile>, StoreError>,
    },
    ThemePersisted {
        user_id: UserId,
        seq: u64,
        theme: String,
        result: Result<(), StoreError>,
    },
    SignOutSettled(Result<(), AuthError>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started(_) => "started",
            Self::SessionChanged(_) => "session_changed",
            Self::SignInDismissed => "sign_in_dismissed",
            Self::ErrorDismissed => "error_dismissed",
            Self::Intent(intent) => intent.name(),
            Self::SessionLoaded(_) => "session_loaded",
            Self::ThemesLoaded(_) => "themes_loaded",
            Self::ProfileLoaded { .. } => "profile_loaded",
            Self::ThemePersisted { .. } => "theme_persisted",
            Self::SignOutSettled(_) => "sign_out_settled",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::Intent(_) | Self::SignInDismissed | Self::ErrorDismissed
        )
    }
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}
