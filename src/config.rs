use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the REST collaborator.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub pdf_api_url: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pdf_api_url: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        let base_url = std::env::var("API_BASE_URL").map_err(|_| AppError::configuration("API_BASE_URL not set"))?;
        let timeout_secs = std::env::var("API_TIMEOUT_SECS")
            .map(|val| val.parse::<u64>())
            .unwrap_or(Ok(DEFAULT_TIMEOUT_SECS))
            .map_err(|_| AppError::configuration("API_TIMEOUT_SECS must be a valid integer"))?;

        let mut config = Self::new(base_url);
        config.token = std::env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty());
        config.timeout = Duration::from_secs(timeout_secs);
        config.pdf_api_url = std::env::var("PDF_API_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string());
        Ok(config)
    }
}

/// Session token settings. The secret is optional on the client side.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub jwt_secret: Option<String>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
        }
    }
}
