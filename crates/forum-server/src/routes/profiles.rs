//! Profile subresource routes.
//!
//! - GET/PUT /forum/api/users/{nickname}/public-profile
//! - GET/PUT /forum/api/users/{nickname}/restricted-profile
//!
//! The public profile PUT is a full replacement (both fields mandatory);
//! the restricted profile PUT is a merge where omitted optional fields
//! keep their stored values.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use forum_core::User;
use forum_store::{PublicProfileUpdate, RestrictedProfileUpdate, UserPatch};

use crate::error::{ApiError, ApiResult};
use crate::fields;
use crate::href;
use crate::media::{self, Resource};
use crate::represent::hal;
use crate::state::AppState;
use crate::validate::{self, FieldMap};

const PUBLIC: &str = "User public profile";
const RESTRICTED: &str = "User restricted profile";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/forum/api/users/{nickname}/public-profile",
            get(get_public_profile).put(edit_public_profile),
        )
        .route(
            "/forum/api/users/{nickname}/restricted-profile",
            get(get_restricted_profile).put(edit_restricted_profile),
        )
}

// ============================================================================
// Helpers
// ============================================================================

async fn fetch_user(
    state: &AppState,
    nickname: &str,
    resource_type: &'static str,
    url: &str,
) -> ApiResult<User> {
    state
        .store()
        .get_user(nickname)
        .await
        .map_err(|e| ApiError::from_store(e, resource_type, url.to_string()))?
        .ok_or_else(|| {
            ApiError::not_found(
                resource_type,
                url.to_string(),
                format!("There is no a user with nickname {nickname}"),
            )
        })
}

/// Runs the shared PUT preamble: existence, content type, body parse,
/// field extraction.
async fn validated_fields(
    state: &AppState,
    nickname: &str,
    resource: Resource,
    resource_type: &'static str,
    url: &str,
    headers: &HeaderMap,
    body: &[u8],
    specs: &'static [fields::FieldSpec],
) -> ApiResult<FieldMap> {
    fetch_user(state, nickname, resource_type, url).await?;
    let binding = media::binding(resource);
    if let Some(expected) = binding.input {
        validate::check_content_type(headers, expected)
            .map_err(|e| e.into_api(resource_type, url.to_string()))?;
    }
    let descriptors = validate::parse_template(body)
        .map_err(|e| e.into_api(resource_type, url.to_string()))?;
    validate::extract(specs, &descriptors)
        .map_err(|e| e.into_api(resource_type, url.to_string()))
}

async fn apply_patch(
    state: &AppState,
    nickname: &str,
    patch: UserPatch,
    resource_type: &'static str,
    url: String,
) -> ApiResult<Response> {
    let modified = state
        .store()
        .modify_user(nickname, patch)
        .await
        .map_err(|e| ApiError::from_store(e, resource_type, url.clone()))?;
    if !modified {
        // Existence was checked before validation, so a false here means
        // the write itself was refused.
        return Err(ApiError::store_failure(
            resource_type,
            url,
            "The profile could not be updated",
        ));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Public profile
// ============================================================================

async fn get_public_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Response> {
    let url = href::public_profile(&nickname);
    let user = fetch_user(&state, &nickname, PUBLIC, &url).await?;
    let envelope = hal::public_profile_envelope(&user);
    Ok(media::hypermedia(Resource::UserPublicProfile, &envelope))
}

async fn edit_public_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let url = href::public_profile(&nickname);
    let map = validated_fields(
        &state,
        &nickname,
        Resource::UserPublicProfile,
        PUBLIC,
        &url,
        &headers,
        &body,
        fields::PUBLIC_PROFILE_EDIT,
    )
    .await?;
    let patch = UserPatch {
        public: Some(PublicProfileUpdate {
            signature: map.required("signature"),
            avatar: map.required("avatar"),
        }),
        restricted: None,
    };
    apply_patch(&state, &nickname, patch, PUBLIC, url).await
}

// ============================================================================
// Restricted profile
// ============================================================================

async fn get_restricted_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Response> {
    let url = href::restricted_profile(&nickname);
    let user = fetch_user(&state, &nickname, RESTRICTED, &url).await?;
    let envelope = hal::restricted_profile_envelope(&user);
    Ok(media::hypermedia(Resource::UserRestrictedProfile, &envelope))
}

async fn edit_restricted_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let url = href::restricted_profile(&nickname);
    let map = validated_fields(
        &state,
        &nickname,
        Resource::UserRestrictedProfile,
        RESTRICTED,
        &url,
        &headers,
        &body,
        fields::RESTRICTED_PROFILE_EDIT,
    )
    .await?;
    let patch = UserPatch {
        public: None,
        restricted: Some(RestrictedProfileUpdate {
            firstname: map.get_owned("givenName"),
            lastname: map.get_owned("familyName"),
            email: map.get_owned("email"),
            website: map.get_owned("website"),
            mobile: map.get_owned("telephone"),
            skype: map.get_owned("skype"),
            birthday: map.get_owned("birthday"),
            residence: map.get_owned("address"),
            gender: map.get_owned("gender"),
            picture: map.get_owned("image"),
        }),
    };
    apply_patch(&state, &nickname, patch, RESTRICTED, url).await
}
