// lib.rs - shared core of the pinboard header

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod model;
pub mod theme;
pub mod view;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::App;
pub use capabilities::{AuthError, Capabilities, Effect, Route, StoreError};
pub use config::Config;
pub use crux_core::App as CruxApp;
pub use event::{Dispatch, Event, Intent};
pub use model::{Model, Profile, Session, SessionUser, UserId};
pub use theme::{ThemePolicy, ThemeSync, ThemeSyncStatus};
pub use view::{HeaderView, UserFacingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

/// Failures surfaced to the user. Both kinds are recoverable: the header keeps
/// working with its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HeaderError {
    #[error("authentication: {0}")]
    Auth(#[from] AuthError),

    #[error("profile store: {0}")]
    Store(#[from] StoreError),
}

impl HeaderError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Auth(AuthError::SignOutFailed { .. }) => "SIGN_OUT_FAILED",
            Self::Auth(AuthError::SessionUnavailable { .. }) => "SESSION_UNAVAILABLE",
            Self::Auth(AuthError::UnexpectedOutput { .. }) => "AUTH_PROTOCOL_ERROR",
            Self::Store(StoreError::NotConfigured { .. } | StoreError::InvalidUrl { .. }) => {
                "STORE_MISCONFIGURED"
            }
            Self::Store(StoreError::Encode { .. } | StoreError::Decode { .. }) => {
                "SERIALIZATION_ERROR"
            }
            Self::Store(StoreError::Transport { .. }) => "NETWORK_ERROR",
            Self::Store(StoreError::Rejected { status: 401, .. }) => "AUTH_ERROR",
            Self::Store(StoreError::Rejected { status: 403, .. }) => "FORBIDDEN",
            Self::Store(StoreError::Rejected { .. }) => "STORE_REJECTED",
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Auth(AuthError::SignOutFailed { .. } | AuthError::SessionUnavailable { .. }) => {
                true
            }
            Self::Auth(AuthError::UnexpectedOutput { .. }) => false,
            Self::Store(e) => e.is_retryable(),
        }
    }

    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        if self.is_retryable() {
            ErrorSeverity::Transient
        } else {
            ErrorSeverity::Permanent
        }
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Auth(AuthError::SignOutFailed { .. }) => {
                "We couldn't sign you out. Please try again.".into()
            }
            Self::Auth(_) => "We couldn't check your sign-in status.".into(),
            Self::Store(StoreError::Transport { .. }) => {
                "Your theme couldn't be saved. Check your connection and try again.".into()
            }
            Self::Store(StoreError::Rejected { status: 401 | 403, .. }) => {
                "Your session has expired. Please sign in again.".into()
            }
            Self::Store(StoreError::Decode { .. }) => "We couldn't load your profile.".into(),
            Self::Store(_) => "Your theme couldn't be saved. Please try again later.".into(),
        }
    }
}
