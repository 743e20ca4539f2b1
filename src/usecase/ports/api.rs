use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Unable to reach the server.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("not authorized")]
    Unauthorized { message: Option<String> },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("request build error: {0}")]
    Build(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.filter(|text| !text.trim().is_empty());
        if status == 401 || status == 403 {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status { status, message }
        }
    }

    /// The server's `{ message }` verbatim when present, else a fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            }
            | ApiError::Unauthorized {
                message: Some(message),
            } => message.clone(),
            ApiError::Transport(_) => TRANSPORT_ERROR_MESSAGE.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Post,
    Patch,
    Delete,
}

impl Mutation {
    pub fn as_str(self) -> &'static str {
        match self {
            Mutation::Post => "POST",
            Mutation::Patch => "PATCH",
            Mutation::Delete => "DELETE",
        }
    }
}

pub type QueryParams = Vec<(String, String)>;

/// The REST backend as seen by every screen.
///
/// Futures are not `Send`: the whole UI runs on one cooperative event loop.
#[async_trait(?Send)]
pub trait ResourceApi {
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError>;

    /// A success with an empty body resolves to `Value::Null`.
    async fn send(
        &self,
        method: Mutation,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}
