use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default bound on `POST /answers`; short so the local fallback is reached promptly.
pub const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(5);
/// Default bound on the listing and question-body requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Validated settings for talking to the exam backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    api_base_url: Url,
    answer_timeout: Duration,
    request_timeout: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct ClientSettingsDraft {
    pub api_base_url: Option<String>,
    pub answer_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientSettingsError {
    #[error("API base URL is required")]
    MissingBaseUrl,
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("timeouts must be greater than zero")]
    ZeroTimeout,
}

impl ClientSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `ClientSettingsError` if the base URL is missing or does not
    /// parse, or if a timeout of zero was given.
    pub fn validate(self) -> Result<ClientSettings, ClientSettingsError> {
        let raw = normalize_optional(self.api_base_url).ok_or(ClientSettingsError::MissingBaseUrl)?;
        let api_base_url =
            Url::parse(&raw).map_err(|_| ClientSettingsError::InvalidBaseUrl(raw.clone()))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ClientSettingsError::InvalidBaseUrl(raw));
        }

        let answer_timeout = to_timeout(self.answer_timeout_ms, DEFAULT_ANSWER_TIMEOUT)?;
        let request_timeout = to_timeout(self.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT)?;

        Ok(ClientSettings {
            api_base_url,
            answer_timeout,
            request_timeout,
        })
    }
}

impl ClientSettings {
    /// Settings with default timeouts for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `ClientSettingsError::InvalidBaseUrl` if the URL does not parse.
    pub fn for_base_url(base_url: &str) -> Result<Self, ClientSettingsError> {
        ClientSettingsDraft {
            api_base_url: Some(base_url.to_owned()),
            ..ClientSettingsDraft::default()
        }
        .validate()
    }

    #[must_use]
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// Base URL as a string without a trailing slash, ready for path joins.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base_url.as_str().trim_end_matches('/')
    }

    #[must_use]
    pub fn answer_timeout(&self) -> Duration {
        self.answer_timeout
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn to_timeout(ms: Option<u64>, default: Duration) -> Result<Duration, ClientSettingsError> {
    match ms {
        None => Ok(default),
        Some(0) => Err(ClientSettingsError::ZeroTimeout),
        Some(ms) => Ok(Duration::from_millis(ms)),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
