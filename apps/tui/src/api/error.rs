use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was cancelled because its inputs changed. Never shown.
    #[error("request aborted")]
    Aborted,
    #[error("server responded with status {code}")]
    Status { code: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("access token is not a valid header value")]
    InvalidToken,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Coarse code for the error panel. `None` for aborts.
    pub const fn code(&self) -> Option<ErrorCode> {
        Some(match self {
            Self::Aborted => return None,
            Self::Status { code } => ErrorCode::from_status(*code),
            Self::Timeout => ErrorCode::Timeout,
            Self::Network(_) => ErrorCode::Unreachable,
            Self::Decode(_) => ErrorCode::Malformed,
            Self::InvalidToken => ErrorCode::Unauthorized,
            Self::Internal(_) => ErrorCode::Server,
        })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = err.status() {
            return Self::Status {
                code: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Server,
    Timeout,
    Unreachable,
    Malformed,
}

impl ErrorCode {
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            400..=499 => Self::BadRequest,
            _ => Self::Server,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::BadRequest => "Invalid request",
            Self::Unauthorized => "Not authorised",
            Self::NotFound => "No results",
            Self::Server => "Server error",
            Self::Timeout => "Request timed out",
            Self::Unreachable => "Service unreachable",
            Self::Malformed => "Unexpected response",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "The selected combination was rejected. Check the inputs and try again."
            }
            Self::Unauthorized => {
                "This project needs a valid access token. Set HAZARD_API_TOKEN and restart."
            }
            Self::NotFound => "The service has no results for this selection.",
            Self::Server => "The hazard service failed to process the request. Try again later.",
            Self::Timeout => "The hazard service took too long to respond. Try again later.",
            Self::Unreachable => "Could not reach the hazard service. Check the base URL.",
            Self::Malformed => "The service returned data this viewer does not understand.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_has_no_panel_code() {
        assert!(ApiError::Aborted.is_abort());
        assert_eq!(ApiError::Aborted.code(), None);
    }

    #[test]
    fn status_codes_map_to_coarse_codes() {
        assert_eq!(ErrorCode::from_status(400), ErrorCode::BadRequest);
        assert_eq!(ErrorCode::from_status(403), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_status(504), ErrorCode::Timeout);
        assert_eq!(ErrorCode::from_status(500), ErrorCode::Server);
        assert_eq!(
            ApiError::Status { code: 422 }.code(),
            Some(ErrorCode::BadRequest)
        );
    }

    #[test]
    fn decode_errors_are_malformed() {
        let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.code(), Some(ErrorCode::Malformed));
    }
}
