use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crux_http::Http;

use crate::config::ProfileStoreConfig;
use crate::event::Event;
use crate::model::{Profile, UserId};

pub const REST_PATH: &str = "rest/v1/";

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreError {
    #[error("profile store not configured: {reason}")]
    NotConfigured { reason: String },

    #[error("invalid profile store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request body could not be encoded: {message}")]
    Encode { message: String },

    #[error("response body could not be decoded: {message}")]
    Decode { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl StoreError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Rejected { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            Self::NotConfigured { .. }
            | Self::InvalidUrl { .. }
            | Self::Encode { .. }
            | Self::Decode { .. } => false,
        }
    }
}

// crux_http reports 4xx/5xx answers as `Error::Http`, never as `Ok`.
impl From<crux_http::Error> for StoreError {
    fn from(error: crux_http::Error) -> Self {
        match error {
            crux_http::Error::Http(rejection) => Self::Rejected {
                status: u16::from(rejection.code),
                message: rejection.code.canonical_reason().to_owned(),
            },
            crux_http::Error::Json(message) => Self::Decode { message },
            crux_http::Error::Url(reason) => Self::InvalidUrl {
                url: String::new(),
                reason,
            },
            crux_http::Error::Io(message) => Self::Transport { message },
            crux_http::Error::Timeout => Self::Transport {
                message: "request timed out".into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ThemePatch<'a> {
    theme: &'a str,
}

/// Client for the `users` table behind a PostgREST endpoint.
///
/// Writes are single-row, keyed by exact equality on the id column, and any
/// non-2xx answer is reported as a [`StoreError`].
pub struct ProfileStore<'a> {
    http: &'a Http<Event>,
    config: &'a ProfileStoreConfig,
}

impl<'a> ProfileStore<'a> {
    pub fn new(http: &'a Http<Event>, config: &'a ProfileStoreConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the profile row of `user_id`; answered with `Event::ProfileLoaded`.
    /// `as_of` is the last theme write issued before this read.
    pub fn read_profile(
        &self,
        user_id: &UserId,
        access_token: Option<&str>,
        as_of: u64,
    ) -> Result<(), StoreError> {
        let url = row_url(self.config, user_id, true)?;
        let user_id = user_id.clone();

        let mut builder = self.http.get(url.as_str()).header("Accept", "application/json");
        for (name, value) in auth_headers(self.config, access_token) {
            builder = builder.header(name, value.as_str());
        }

        builder
            .expect_json::<Vec<Profile>>()
            .send(move |result| Event::ProfileLoaded {
                user_id,
                as_of,
                result: match result {
                    Ok(mut response) => {
                        let status = response.status();
                        check_status(u16::from(status), status.canonical_reason()).map(|()| {
                            response.take_body().and_then(|rows| rows.into_iter().next())
                        })
                    }
                    Err(e) => Err(StoreError::from(e)),
                },
            });

        Ok(())
    }

    /// Persist `theme` for `user_id`; answered with `Event::ThemePersisted`.
    pub fn update_theme(
        &self,
        user_id: &UserId,
        access_token: Option<&str>,
        seq: u64,
        theme: &str,
    ) -> Result<(), StoreError> {
        let url = row_url(self.config, user_id, false)?;

        let mut builder = self
            .http
            .patch(url.as_str())
            .header("Prefer", "return=minimal")
            .header("Content-Type", "application/json");
        for (name, value) in auth_headers(self.config, access_token) {
            builder = builder.header(name, value.as_str());
        }

        let builder = builder
            .body_json(&ThemePatch { theme })
            .map_err(|e| StoreError::Encode {
                message: e.to_string(),
            })?;

        let user_id = user_id.clone();
        let theme = theme.to_owned();
        builder.send(move |result| Event::ThemePersisted {
            user_id,
            seq,
            theme,
            result: match result {
                Ok(response) => {
                    let status = response.status();
                    check_status(u16::from(status), status.canonical_reason())
                }
                Err(e) => Err(StoreError::from(e)),
            },
        });

        Ok(())
    }
}

fn check_status(status: u16, reason: &str) -> Result<(), StoreError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StoreError::Rejected {
            status,
            message: reason.to_owned(),
        })
    }
}

fn auth_headers(config: &ProfileStoreConfig, access_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut headers = Vec::with_capacity(2);
    if !config.api_key.is_empty() {
        headers.push(("apikey", config.api_key.clone()));
    }
    let bearer = access_token
        .filter(|t| !t.is_empty())
        .or_else(|| Some(config.api_key.as_str()).filter(|k| !k.is_empty()));
    if let Some(token) = bearer {
        headers.push(("Authorization", format!("Bearer {token}")));
    }
    headers
}

/// `{base}/rest/v1/{table}?[select=*&]{id_column}=eq.{id}`
pub(crate) fn row_url(config: &ProfileStoreConfig, user_id: &UserId, select_all: bool) -> Result<Url, StoreError> {
    if config.base_url.trim().is_empty() {
        return Err(StoreError::NotConfigured {
            reason: "base_url is empty".into(),
        });
    }
    if config.table.is_empty() || config.id_column.is_empty() {
        return Err(StoreError::NotConfigured {
            reason: "table and id_column are required".into(),
        });
    }

    let invalid = |reason: String| StoreError::InvalidUrl {
        url: config.base_url.clone(),
        reason,
    };

    let mut base = Url::parse(config.base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base
        .join(REST_PATH)
        .and_then(|rest| rest.join(&config.table))
        .map_err(|e| invalid(e.to_string()))?;

    {
        let mut pairs = url.query_pairs_mut();
        if select_all {
            pairs.append_pair("select", "*");
        }
        pairs.append_pair(&config.id_column, &format!("eq.{}", user_id.as_str()));
    }

    Ok(url)
}
