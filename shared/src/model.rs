use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;
use crate::theme::ThemeController;
use crate::HeaderError;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(UserId);

// --- Session ---

/// The signed-in user as reported by the auth provider.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Bearer token for the profile store. Never logged.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            avatar_url: None,
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

// Redact debug output: the token is a credential.
impl fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionUser")
            .field("id", &self.id)
            .field("avatar_url", &self.avatar_url)
            .field("access_token_present", &self.access_token.is_some())
            .finish()
    }
}

/// Authentication state. A user id exists iff the session is present.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    #[must_use]
    pub const fn absent() -> Self {
        Self { user: None }
    }

    #[must_use]
    pub const fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.avatar_url.as_deref())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.access_token.as_deref())
    }
}

// --- Profile ---

/// A row of the remote `users` table. Only `theme` is interpreted here; the
/// remaining columns ride along untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    #[serde(rename = "uuid")]
    pub user_id: UserId,
    #[serde(default)]
    pub theme: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    pub fn new(user_id: UserId, theme: impl Into<String>) -> Self {
        Self {
            user_id,
            theme: theme.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Copy of this profile with the theme replaced.
    #[must_use]
    pub fn with_theme(&self, theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            ..self.clone()
        }
    }
}

// --- Model ---

#[derive(Debug, Default)]
pub struct Model {
    pub config: Config,
    pub session: Session,

    /// Last committed profile of the signed-in user.
    pub profile: Option<Profile>,
    pub themes: Vec<String>,

    /// Theme applied to the root display context while signed out.
    pub local_theme: Option<String>,
    pub theme: ThemeController,

    pub sign_in_dialog_visible: bool,
    pub active_error: Option<HeaderError>,
}

impl Model {
    pub fn set_error(&mut self, error: impl Into<HeaderError>) {
        self.active_error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_present()
    }

    /// Theme the header should currently display.
    #[must_use]
    pub fn active_theme(&self) -> Option<&str> {
        if self.session.is_present() {
            self.theme.visible_theme(self.profile.as_ref())
        } else {
            self.local_theme.as_deref()
        }
    }

    /// Forget everything tied to the previous user.
    pub fn clear_user_state(&mut self) {
        self.profile = None;
        self.theme.reset();
    }
}
