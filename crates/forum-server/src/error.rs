//! API error types with structured problem responses.
//!
//! Every failure surfaces to the caller as the same payload shape,
//! `{title, message, resource_type, resource_url}`, with the HTTP status
//! determined by the taxonomy below. Nothing is retried; a store failure
//! is fatal for the request but never for the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forum_store::StoreError;
use serde::Serialize;

/// API error that can be returned from handlers.
///
/// Each variant carries the resource context so the problem payload can
/// name the resource type and URL the failure occurred on.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown id or nickname (404).
    #[error("not found: {message}")]
    NotFound {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },

    /// Wrong or missing Content-Type on a mutating request (415).
    #[error("unsupported media type: {message}")]
    UnsupportedMediaType {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },

    /// Body that is not a structured document at all (415), or a document
    /// whose structure is wrong for the operation (400).
    #[error("malformed body: {message}")]
    MalformedBody {
        resource_type: &'static str,
        resource_url: String,
        message: String,
        /// True when the body failed to parse outright; maps to 415.
        unparsable: bool,
    },

    /// Mandatory field absent from the template data (400).
    #[error("missing field: {message}")]
    MissingField {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },

    /// Duplicate nickname at creation (409).
    #[error("conflict: {message}")]
    Conflict {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },

    /// Write rejected by the store after validation passed (500).
    #[error("store failure: {message}")]
    StoreFailure {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },

    /// History query matched nothing (404). Deliberately distinct from the
    /// always-200 collection resources.
    #[error("no match: {message}")]
    NoMatch {
        resource_type: &'static str,
        resource_url: String,
        message: String,
    },
}

impl ApiError {
    pub fn not_found(
        resource_type: &'static str,
        resource_url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type,
            resource_url: resource_url.into(),
            message: message.into(),
        }
    }

    pub fn conflict(
        resource_type: &'static str,
        resource_url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            resource_type,
            resource_url: resource_url.into(),
            message: message.into(),
        }
    }

    pub fn store_failure(
        resource_type: &'static str,
        resource_url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StoreFailure {
            resource_type,
            resource_url: resource_url.into(),
            message: message.into(),
        }
    }

    pub fn no_match(resource_type: &'static str, resource_url: impl Into<String>) -> Self {
        Self::NoMatch {
            resource_type,
            resource_url: resource_url.into(),
            message: "Cannot find any message with the provided restrictions".into(),
        }
    }

    /// Maps a store error into the taxonomy, attaching resource context.
    pub fn from_store(
        err: StoreError,
        resource_type: &'static str,
        resource_url: impl Into<String>,
    ) -> Self {
        let resource_url = resource_url.into();
        match err {
            StoreError::MessageNotFound(id) => Self::not_found(
                resource_type,
                resource_url,
                format!("There is no a message with id {id}"),
            ),
            StoreError::UserNotFound(nickname) => Self::not_found(
                resource_type,
                resource_url,
                format!("There is no a user with nickname {nickname}"),
            ),
            StoreError::DuplicateNickname(nickname) => Self::conflict(
                resource_type,
                resource_url,
                format!("There is already a user with same nickname {nickname}"),
            ),
            StoreError::InvalidProfile(reason) => Self::MalformedBody {
                resource_type,
                resource_url,
                message: reason,
                unparsable: false,
            },
            StoreError::Backend(reason) => Self::store_failure(resource_type, resource_url, reason),
        }
    }

    /// Short problem title, following the original vocabulary.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Resource not found",
            Self::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            Self::MalformedBody { unparsable, .. } => {
                if *unparsable {
                    "Unsupported Media Type"
                } else {
                    "Wrong request format"
                }
            }
            Self::MissingField { .. } => "Wrong request format",
            Self::Conflict { .. } => "Wrong nickname",
            Self::StoreFailure { .. } => "Internal error",
            Self::NoMatch { .. } => "Empty list",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::NoMatch { .. } => StatusCode::NOT_FOUND,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::MalformedBody { unparsable, .. } => {
                if *unparsable {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                } else {
                    StatusCode::BAD_REQUEST
                }
            }
            Self::MissingField { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn context(&self) -> (&'static str, &str, &str) {
        match self {
            Self::NotFound {
                resource_type,
                resource_url,
                message,
            }
            | Self::UnsupportedMediaType {
                resource_type,
                resource_url,
                message,
            }
            | Self::MalformedBody {
                resource_type,
                resource_url,
                message,
                ..
            }
            | Self::MissingField {
                resource_type,
                resource_url,
                message,
            }
            | Self::Conflict {
                resource_type,
                resource_url,
                message,
            }
            | Self::StoreFailure {
                resource_type,
                resource_url,
                message,
            }
            | Self::NoMatch {
                resource_type,
                resource_url,
                message,
            } => (resource_type, resource_url, message),
        }
    }
}

/// JSON problem payload.
#[derive(Debug, Serialize)]
pub struct ProblemBody {
    /// Short description of the problem.
    pub title: &'static str,
    /// Long description of the problem.
    pub message: String,
    /// Resource type the request targeted.
    pub resource_type: &'static str,
    /// URL of the targeted resource.
    pub resource_url: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed on store write");
        }
        let (resource_type, resource_url, message) = self.context();
        let body = ProblemBody {
            title: self.title(),
            message: message.to_string(),
            resource_type,
            resource_url: resource_url.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let e = ApiError::not_found("Message", "/forum/api/messages/msg-1", "missing");
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);

        let e = ApiError::conflict("User", "/forum/api/users/", "dup");
        assert_eq!(e.status_code(), StatusCode::CONFLICT);

        let e = ApiError::store_failure("Message", "/forum/api/messages/", "down");
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let e = ApiError::no_match("History", "/forum/api/users/x/history");
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_body_statuses() {
        let unparsable = ApiError::MalformedBody {
            resource_type: "Message",
            resource_url: "/forum/api/messages/".into(),
            message: "not json".into(),
            unparsable: true,
        };
        assert_eq!(unparsable.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(unparsable.title(), "Unsupported Media Type");

        let malformed = ApiError::MalformedBody {
            resource_type: "Message",
            resource_url: "/forum/api/messages/".into(),
            message: "no template".into(),
            unparsable: false,
        };
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.title(), "Wrong request format");
    }

    #[test]
    fn store_errors_map_into_taxonomy() {
        let e = ApiError::from_store(
            StoreError::DuplicateNickname("AxelW".into()),
            "User",
            "/forum/api/users/",
        );
        assert_eq!(e.status_code(), StatusCode::CONFLICT);

        let e = ApiError::from_store(
            StoreError::MessageNotFound(forum_core::MessageId::from_number(7)),
            "Message",
            "/forum/api/messages/msg-7",
        );
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);

        let e = ApiError::from_store(
            StoreError::Backend("io".into()),
            "Message",
            "/forum/api/messages/",
        );
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
