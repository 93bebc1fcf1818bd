use notehub_common::api::ErrorMessage;
use reqwest::StatusCode;

/// Message used when neither the backend nor the transport gave us anything better.
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Every failed backend call ends up as one of these. The message is what the user sees, so
/// backend `detail` text is kept verbatim.
///
/// Cloneable because one in-flight query can have several waiters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorMessage>(body)
            .map(|x| x.message())
            .ok()
            .filter(|x| !x.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or(GENERIC_MESSAGE)
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(detail),
            StatusCode::FORBIDDEN => Self::Forbidden(detail),
            StatusCode::NOT_FOUND => Self::NotFound(detail),
            _ => Self::Rejected {
                status: status.as_u16(),
                detail,
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Rejected { status, .. } => StatusCode::from_u16(*status).ok(),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }

        let message = value.to_string();
        if message.is_empty() {
            Self::Transport(GENERIC_MESSAGE.into())
        } else {
            Self::Transport(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_kept_verbatim() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{"detail": "Username taken"}"#,
        );
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                detail: "Username taken".into()
            }
        );
        assert_eq!(err.to_string(), "Username taken");
    }

    #[test]
    fn missing_payload_falls_back_to_reason() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, b"<html>upstream</html>");
        assert_eq!(err.to_string(), "Bad Gateway");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn auth_statuses_get_their_own_kind() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, br#"{"detail": "Admin access required"}"#);
        assert!(err.is_forbidden());
        assert_eq!(err.to_string(), "Admin access required");

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, b"");
        assert_eq!(err, ApiError::Unauthorized("Unauthorized".into()));
    }
}
