//! Media types, profile names, and the resource→profile registry.
//!
//! Negotiation is static: every resource commits to one output profile
//! and one input media type at startup. The `Accept` header plays no
//! part; the `Content-Type` of mutating requests must equal the declared
//! input media type exactly (string equality, no parameters).

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

// ============================================================================
// Media types and profile names
// ============================================================================

/// Collection+JSON media type.
pub const COLLECTION_JSON: &str = "application/vnd.collection+json";

/// HAL+JSON media type.
pub const HAL_JSON: &str = "application/hal+json";

/// The earliest profile: plain JSON with embedded link arrays.
pub const LINKED_JSON: &str = "application/json";

/// Profile document for user representations.
pub const FORUM_USER_PROFILE: &str = "/profiles/user-profile";

/// Profile document for message representations.
pub const FORUM_MESSAGE_PROFILE: &str = "/profiles/message-profile";

/// Atom threading extensions, used for the in-reply-to relation.
pub const ATOM_THREAD_PROFILE: &str = "https://tools.ietf.org/html/rfc4685";

// ============================================================================
// Registry
// ============================================================================

/// Output profile of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    LinkedJson,
    HalJson,
    CollectionJson,
}

impl Profile {
    /// The media type the profile is served with.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            Self::LinkedJson => LINKED_JSON,
            Self::HalJson => HAL_JSON,
            Self::CollectionJson => COLLECTION_JSON,
        }
    }
}

/// The API's resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Messages,
    Message,
    Users,
    User,
    UserPublicProfile,
    UserRestrictedProfile,
    History,
}

/// One registry row: a resource's declared profiles.
#[derive(Debug, Clone, Copy)]
pub struct MediaBinding {
    pub resource: Resource,
    /// Profile of successful response bodies.
    pub output: Profile,
    /// Profile document appended to the response content type.
    pub profile_doc: &'static str,
    /// Required `Content-Type` for mutating requests, if the resource has
    /// any.
    pub input: Option<&'static str>,
}

/// Static registry, resolved once. Controllers look their row up by
/// resource instead of branching on media types inline.
pub const REGISTRY: &[MediaBinding] = &[
    MediaBinding {
        resource: Resource::Messages,
        output: Profile::CollectionJson,
        profile_doc: FORUM_MESSAGE_PROFILE,
        input: Some(COLLECTION_JSON),
    },
    MediaBinding {
        resource: Resource::Message,
        output: Profile::HalJson,
        profile_doc: FORUM_MESSAGE_PROFILE,
        input: Some(COLLECTION_JSON),
    },
    MediaBinding {
        resource: Resource::Users,
        output: Profile::CollectionJson,
        profile_doc: FORUM_USER_PROFILE,
        input: Some(COLLECTION_JSON),
    },
    MediaBinding {
        resource: Resource::User,
        output: Profile::LinkedJson,
        profile_doc: FORUM_USER_PROFILE,
        input: None,
    },
    MediaBinding {
        resource: Resource::UserPublicProfile,
        output: Profile::HalJson,
        profile_doc: FORUM_USER_PROFILE,
        input: Some(COLLECTION_JSON),
    },
    MediaBinding {
        resource: Resource::UserRestrictedProfile,
        output: Profile::HalJson,
        profile_doc: FORUM_USER_PROFILE,
        input: Some(COLLECTION_JSON),
    },
    MediaBinding {
        resource: Resource::History,
        output: Profile::CollectionJson,
        profile_doc: FORUM_MESSAGE_PROFILE,
        input: None,
    },
];

/// Looks a resource's binding up in the registry.
#[must_use]
pub fn binding(resource: Resource) -> &'static MediaBinding {
    // The registry enumerates every Resource variant.
    REGISTRY
        .iter()
        .find(|b| b.resource == resource)
        .expect("resource missing from media registry")
}

/// Renders a hypermedia body with the resource's declared content type,
/// `<media type>;<profile document>`.
pub fn hypermedia<T: Serialize>(resource: Resource, body: &T) -> Response {
    let b = binding(resource);
    let content_type = format!("{};{}", b.output.media_type(), b.profile_doc);
    match serde_json::to_string(body) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            json,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize envelope");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
