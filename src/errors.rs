use serde::Serialize;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("api error ({status:?}): {message}")]
    Api { status: Option<u16>, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation(errors)
    }

    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn token(err: impl Into<String>) -> Self {
        Self::Token(err.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP-like status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized(_) | AppError::Token(_) => Some(401),
            AppError::Forbidden(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::BadRequest(_) | AppError::Validation(_) => Some(400),
            AppError::Api { status, .. } => *status,
            AppError::Network(_) => None,
            AppError::Configuration(_) | AppError::Decode(_) | AppError::Internal(_) => Some(500),
        }
    }

    /// Message shown to the user. Unlike `Display`, it carries no category prefix.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::BadRequest(m)
            | AppError::Network(m)
            | AppError::Configuration(m)
            | AppError::Token(m)
            | AppError::Decode(m)
            | AppError::Internal(m) => m.clone(),
            AppError::Validation(errors) => errors.join("\n"),
            AppError::Api { message, .. } => message.clone(),
        }
    }

    pub fn normalized(&self) -> NormalizedError {
        NormalizedError {
            message: self.user_message(),
            status: self.status(),
        }
    }
}

/// The `{message, status}` shape every collaborator failure is reduced to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::api(Some(status.as_u16()), value.to_string()),
            None if value.is_decode() => Self::Decode(value.to_string()),
            None => Self::network(format!("Error de conexión con el servidor: {value}")),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::token(value.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}
