//! Message history routes.
//!
//! - GET /forum/api/users/{nickname}/history?length=&before=&after=
//!
//! The window parameters are UNIX timestamps (`before`, `after`) and a
//! result cap (`length`); all three default to the `-1` "absent" sentinel.
//! An empty window is a 404 with the "Empty list" problem, not an empty
//! collection.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::history::{self, Window};
use crate::href;
use crate::media::{self, Resource};
use crate::represent::collection;
use crate::state::AppState;

const HISTORY: &str = "History";

pub fn routes() -> Router<AppState> {
    Router::new().route("/forum/api/users/{nickname}/history", get(get_history))
}

/// Raw query parameters, parsed leniently as strings so a non-numeric
/// value can be reported as a 400 instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
struct HistoryParams {
    length: Option<String>,
    before: Option<String>,
    after: Option<String>,
}

impl HistoryParams {
    fn window(&self, url: &str) -> ApiResult<Window> {
        Ok(Window {
            length: parse_bound(self.length.as_deref(), "length", url)?,
            before: parse_bound(self.before.as_deref(), "before", url)?,
            after: parse_bound(self.after.as_deref(), "after", url)?,
        })
    }
}

fn parse_bound(raw: Option<&str>, name: &str, url: &str) -> ApiResult<i64> {
    match raw {
        None => Ok(history::UNBOUNDED),
        Some(v) => v.parse().map_err(|_| ApiError::MalformedBody {
            resource_type: HISTORY,
            resource_url: url.to_string(),
            message: format!("the {name} parameter must be an integer"),
            unparsable: false,
        }),
    }
}

async fn get_history(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Response> {
    let url = href::history(&nickname);
    let window = params.window(&url)?;
    let messages = state
        .store()
        .messages_by_sender(&nickname)
        .await
        .map_err(|e| ApiError::from_store(e, HISTORY, url.clone()))?;
    let messages = history::window(messages, window);
    if messages.is_empty() {
        return Err(ApiError::no_match(HISTORY, url));
    }
    let envelope = collection::history_envelope(&nickname, &messages);
    Ok(media::hypermedia(Resource::History, &envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn absent_parameters_default_to_sentinels() {
        let params = HistoryParams::default();
        let w = params.window("/forum/api/users/AxelW/history").unwrap();
        assert_eq!(w.length, history::UNBOUNDED);
        assert_eq!(w.before, history::UNBOUNDED);
        assert_eq!(w.after, history::UNBOUNDED);
    }

    #[test]
    fn numeric_parameters_are_parsed() {
        let params = HistoryParams {
            length: Some("2".into()),
            before: Some("1500".into()),
            after: Some("-1".into()),
        };
        let w = params.window("/forum/api/users/AxelW/history").unwrap();
        assert_eq!(w.length, 2);
        assert_eq!(w.before, 1500);
        assert_eq!(w.after, history::UNBOUNDED);
    }

    #[test]
    fn non_numeric_parameter_is_bad_request() {
        let params = HistoryParams {
            length: Some("two".into()),
            ..HistoryParams::default()
        };
        let err = params
            .window("/forum/api/users/AxelW/history")
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
