use serde::{Deserialize, Serialize};

use crate::capabilities::Route;
use crate::theme::ThemeSyncStatus;
use crate::{ErrorSeverity, HeaderError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BrandView {
    pub title: String,
    pub logo_url: String,
    pub home_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&HeaderError> for UserFacingError {
    fn from(e: &HeaderError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity() == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

/// Everything the header layout needs to draw itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeaderView {
    pub brand: BrandView,
    pub is_authenticated: bool,
    /// "Create" is only offered to signed-in users.
    pub show_create: bool,
    pub show_sign_in: bool,
    pub show_sign_out: bool,
    pub themes: Vec<String>,
    pub active_theme: Option<String>,
    pub theme_sync: ThemeSyncStatus,
    /// `None` means the generic account icon.
    pub avatar_url: Option<String>,
    pub profile_path: String,
    pub sign_in_dialog_visible: bool,
    pub error: Option<UserFacingError>,
}

impl BrandView {
    pub(crate) fn new(title: &str, logo_url: &str) -> Self {
        Self {
            title: title.to_owned(),
            logo_url: logo_url.to_owned(),
            home_path: Route::Home.path().to_owned(),
        }
    }
}
