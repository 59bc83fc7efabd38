use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;

/// API key/token pair forwarded verbatim to the upstream service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub app_key: String,
    pub app_token: String,
}

impl Credentials {
    pub fn new(app_key: impl Into<String>, app_token: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_token: app_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_token", &"<redacted>")
            .finish()
    }
}

/// Per-invocation data supplied by the hosting runtime.
///
/// Tools only ever read it; a fresh context is built for every call and
/// dropped once the call completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub base_url: String,
    pub credentials: Credentials,
}

impl ExecutionContext {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.credentials.app_key = app_key.into();
        self
    }

    pub fn with_app_token(mut self, app_token: impl Into<String>) -> Self {
        self.credentials.app_token = app_token.into();
        self
    }
}
