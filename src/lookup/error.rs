use std::fmt;

#[derive(Debug)]
pub enum LookupError {
    /// Collaborator base URL could not carry the lookup path
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be built or the request never got a response
    Transport { url: String, source: reqwest::Error },

    /// Collaborator answered with a non-2xx status
    Status { url: String, status: u16, message: Option<String> },

    /// Response body was not the expected JSON shape
    Decode { context: String, source: serde_json::Error },

    /// Response shape does not belong to the query that was sent
    UnexpectedResponse(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::InvalidUrl { url, reason } => {
                write!(f, "Invalid collaborator URL '{}': {}", url, reason)
            }
            LookupError::Transport { url, source } => {
                write!(f, "Request to {} failed: {}", url, source)
            }
            LookupError::Status { url, status, message } => match message {
                Some(msg) => write!(f, "{} returned {}: {}", url, status, msg),
                None => write!(f, "{} returned {}", url, status),
            },
            LookupError::Decode { context, source } => {
                write!(f, "JSON decode error ({}): {}", context, source)
            }
            LookupError::UnexpectedResponse(msg) => {
                write!(f, "Unexpected lookup response: {}", msg)
            }
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Transport { source, .. } => Some(source),
            LookupError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
