//! User routes.
//!
//! - GET /forum/api/users/ - List registered users
//! - POST /forum/api/users/ - Register a new user
//! - GET /forum/api/users/{nickname} - Fetch one user
//! - DELETE /forum/api/users/{nickname} - Remove a user
//!
//! Registration does not pre-check the nickname: the store's insert is
//! atomic and reports a duplicate as a conflict, so concurrent registrations
//! of the same nickname cannot both succeed.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use forum_core::{PublicProfile, RestrictedProfile};
use forum_store::NewUser;

use crate::error::{ApiError, ApiResult};
use crate::fields;
use crate::href;
use crate::media::{self, Resource};
use crate::represent::{collection, linked};
use crate::state::AppState;
use crate::validate::{self, FieldMap};

const SINGLE: &str = "User";
const LIST: &str = "Users";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forum/api/users/", get(list_users).post(create_user))
        .route(
            "/forum/api/users/{nickname}",
            get(get_user).delete(delete_user),
        )
}

// ============================================================================
// Helpers
// ============================================================================

/// Assembles the registration payload from validated template fields.
fn new_user_payload(map: &FieldMap) -> NewUser {
    NewUser {
        nickname: map.required("nickname"),
        public_profile: PublicProfile {
            signature: map.required("signature"),
            avatar: map.required("avatar"),
        },
        restricted_profile: RestrictedProfile {
            firstname: map.required("givenName"),
            lastname: map.required("familyName"),
            email: map.required("email"),
            website: map.get_owned("website"),
            mobile: map.get_owned("telephone"),
            skype: map.get_owned("skype"),
            birthday: map.required("birthday"),
            residence: map.get_owned("address"),
            gender: map.required("gender"),
            picture: map.get_owned("image"),
        },
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_users(State(state): State<AppState>) -> ApiResult<Response> {
    let users = state
        .store()
        .get_users()
        .await
        .map_err(|e| ApiError::from_store(e, LIST, href::users()))?;
    let envelope = collection::users_envelope(&users);
    Ok(media::hypermedia(Resource::Users, &envelope))
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let url = href::users();
    let binding = media::binding(Resource::Users);
    if let Some(expected) = binding.input {
        validate::check_content_type(&headers, expected)
            .map_err(|e| e.into_api(LIST, url.clone()))?;
    }
    let descriptors =
        validate::parse_template(&body).map_err(|e| e.into_api(LIST, url.clone()))?;
    let map = validate::extract(fields::USER_CREATE, &descriptors)
        .map_err(|e| e.into_api(LIST, url.clone()))?;
    let nickname = state
        .store()
        .append_user(new_user_payload(&map))
        .await
        .map_err(|e| ApiError::from_store(e, LIST, url))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, href::user(&nickname))],
    )
        .into_response())
}

async fn get_user(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Response> {
    let url = href::user(&nickname);
    let user = state
        .store()
        .get_user(&nickname)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?
        .ok_or_else(|| {
            ApiError::not_found(
                SINGLE,
                url,
                format!("There is no a user with nickname {nickname}"),
            )
        })?;
    let envelope = linked::user_envelope(&user);
    Ok(media::hypermedia(Resource::User, &envelope))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> ApiResult<Response> {
    let url = href::user(&nickname);
    let deleted = state
        .store()
        .delete_user(&nickname)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?;
    if !deleted {
        return Err(ApiError::not_found(
            SINGLE,
            url,
            format!("There is no a user with nickname {nickname}"),
        ));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_remaps_wire_names_to_domain_fields() {
        let body = json!({"template": {"data": [
            {"name": "nickname", "value": "AxelW"},
            {"name": "signature", "value": "sig"},
            {"name": "avatar", "value": "a.png"},
            {"name": "givenName", "value": "Axel"},
            {"name": "familyName", "value": "Wirta"},
            {"name": "email", "value": "axel@example.com"},
            {"name": "birthday", "value": "1990-01-01"},
            {"name": "gender", "value": "male"},
            {"name": "address", "object": {"addressLocality": "Oulu", "addressCountry": "Finland"}},
            {"name": "telephone", "value": "+358400000"}
        ]}});
        let descriptors = validate::parse_template(body.to_string().as_bytes()).unwrap();
        let map = validate::extract(fields::USER_CREATE, &descriptors).unwrap();
        let user = new_user_payload(&map);
        assert_eq!(user.nickname, "AxelW");
        assert_eq!(user.restricted_profile.firstname, "Axel");
        assert_eq!(user.restricted_profile.lastname, "Wirta");
        assert_eq!(
            user.restricted_profile.residence.as_deref(),
            Some("Oulu,Finland")
        );
        assert_eq!(
            user.restricted_profile.mobile.as_deref(),
            Some("+358400000")
        );
        assert_eq!(user.restricted_profile.website, None);
    }
}
