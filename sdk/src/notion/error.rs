use {
    reqwest::StatusCode,
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// Error object returned by the Notion API on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionApiError {
    pub object: String,
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// Error type for Notion operations
#[derive(Error, Debug)]
pub enum NotionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Notion API error ({status}, {code}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("Notion API status error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Query response has more results but no next cursor")]
    MissingCursor,
}

impl NotionError {
    /// Build an error from a non-success response body. Falls back to the raw
    /// body when it is not a Notion error object.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        match serde_json::from_str::<NotionApiError>(&body) {
            Ok(api_error) if api_error.object == "error" => NotionError::Api {
                status,
                code: api_error.code,
                message: api_error.message,
            },
            _ => NotionError::Status { status, body },
        }
    }
}
