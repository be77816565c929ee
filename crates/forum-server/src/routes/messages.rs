//! Message routes.
//!
//! - GET /forum/api/messages/ - List all messages
//! - POST /forum/api/messages/ - Publish a new top-level message
//! - GET /forum/api/messages/{id} - Fetch one message
//! - POST /forum/api/messages/{id} - Reply to a message
//! - PUT /forum/api/messages/{id} - Edit a message
//! - DELETE /forum/api/messages/{id} - Remove a message
//!
//! Mutating requests follow a fixed check order: resource existence, then
//! `Content-Type`, then body parse, then field extraction. Clients probing
//! a dead id with a garbage body therefore get the 404, not the 415.

use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use forum_core::{MessageId, ANONYMOUS};
use forum_store::{MessageEdit, NewMessage};

use crate::error::{ApiError, ApiResult};
use crate::fields;
use crate::href;
use crate::media::{self, Resource};
use crate::represent::{collection, hal};
use crate::state::AppState;
use crate::validate;

const SINGLE: &str = "Message";
const LIST: &str = "Messages";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/forum/api/messages/",
            get(list_messages).post(create_message),
        )
        .route(
            "/forum/api/messages/{id}",
            get(get_message)
                .post(reply_message)
                .put(edit_message)
                .delete(delete_message),
        )
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses a path segment into a message id. Anything that is not
/// `msg-<digits>` refers to no resource, so the failure is a 404.
fn parse_id(raw: &str) -> ApiResult<MessageId> {
    MessageId::from_str(raw).map_err(|_| {
        ApiError::not_found(
            SINGLE,
            format!("{}/messages/{raw}", href::API_ROOT),
            format!("There is no a message with id {raw}"),
        )
    })
}

/// Best-effort client address for audit purposes, taken from the first
/// `X-Forwarded-For` hop when a proxy supplies one.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts the message-creation fields from a request body.
fn new_message_payload(
    body: &[u8],
    headers: &HeaderMap,
    resource_type: &'static str,
    url: &str,
) -> ApiResult<NewMessage> {
    let descriptors = validate::parse_template(body)
        .map_err(|e| e.into_api(resource_type, url.to_string()))?;
    let map = validate::extract(fields::MESSAGE_CREATE, &descriptors)
        .map_err(|e| e.into_api(resource_type, url.to_string()))?;
    Ok(NewMessage {
        title: map.required("headline"),
        body: map.required("articleBody"),
        sender: map.get_owned("author").unwrap_or_else(|| ANONYMOUS.into()),
        origin_ip: client_ip(headers),
    })
}

fn created_at(url: String) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, url)]).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_messages(State(state): State<AppState>) -> ApiResult<Response> {
    let messages = state
        .store()
        .get_messages()
        .await
        .map_err(|e| ApiError::from_store(e, LIST, href::messages()))?;
    let envelope = collection::messages_envelope(&messages);
    Ok(media::hypermedia(Resource::Messages, &envelope))
}

async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let url = href::messages();
    let binding = media::binding(Resource::Messages);
    if let Some(expected) = binding.input {
        validate::check_content_type(&headers, expected)
            .map_err(|e| e.into_api(LIST, url.clone()))?;
    }
    let payload = new_message_payload(&body, &headers, LIST, &url)?;
    let id = state
        .store()
        .create_message(payload)
        .await
        .map_err(|e| ApiError::from_store(e, LIST, url))?;
    Ok(created_at(href::message(&id)))
}

async fn get_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let url = href::message(&id);
    let message = state
        .store()
        .get_message(&id)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?
        .ok_or_else(|| {
            ApiError::not_found(SINGLE, url, format!("There is no a message with id {id}"))
        })?;
    let envelope = hal::message_envelope(&message);
    Ok(media::hypermedia(Resource::Message, &envelope))
}

async fn reply_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let url = href::message(&id);
    let exists = state
        .store()
        .contains_message(&id)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?;
    if !exists {
        return Err(ApiError::not_found(
            SINGLE,
            url,
            format!("There is no a message with id {id}"),
        ));
    }
    let binding = media::binding(Resource::Message);
    if let Some(expected) = binding.input {
        validate::check_content_type(&headers, expected)
            .map_err(|e| e.into_api(SINGLE, url.clone()))?;
    }
    let payload = new_message_payload(&body, &headers, SINGLE, &url)?;
    let reply_id = state
        .store()
        .append_answer(&id, payload)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url))?;
    Ok(created_at(href::message(&reply_id)))
}

async fn edit_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let url = href::message(&id);
    let exists = state
        .store()
        .contains_message(&id)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?;
    if !exists {
        return Err(ApiError::not_found(
            SINGLE,
            url,
            format!("There is no a message with id {id}"),
        ));
    }
    let binding = media::binding(Resource::Message);
    if let Some(expected) = binding.input {
        validate::check_content_type(&headers, expected)
            .map_err(|e| e.into_api(SINGLE, url.clone()))?;
    }
    let descriptors = validate::parse_template(&body)
        .map_err(|e| e.into_api(SINGLE, url.clone()))?;
    let map = validate::extract(fields::MESSAGE_EDIT, &descriptors)
        .map_err(|e| e.into_api(SINGLE, url.clone()))?;
    let edit = MessageEdit {
        title: map.required("headline"),
        body: map.required("articleBody"),
        editor: map.get_owned("editor").unwrap_or_else(|| ANONYMOUS.into()),
    };
    let modified = state
        .store()
        .modify_message(&id, edit)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?;
    if !modified {
        // The id passed the existence check above, so a false here means
        // the write itself was refused.
        return Err(ApiError::store_failure(
            SINGLE,
            url,
            "The message could not be modified",
        ));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn delete_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let url = href::message(&id);
    let deleted = state
        .store()
        .delete_message(&id)
        .await
        .map_err(|e| ApiError::from_store(e, SINGLE, url.clone()))?;
    if !deleted {
        return Err(ApiError::not_found(
            SINGLE,
            url,
            format!("There is no a message with id {id}"),
        ));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
