//! Bounded, time-windowed retrieval of a user's messages.
//!
//! The engine is a pure function over messages the store has already
//! filtered by sender. Bounds are UNIX timestamps with `-1` as the
//! "absent" sentinel, matching the query-string convention of the API.

use forum_core::Message;

/// Sentinel for an absent `length`, `before` or `after` parameter.
pub const UNBOUNDED: i64 = -1;

/// History window parameters as parsed from the query string.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    /// Maximum number of messages to return; `-1` for no cap.
    pub length: i64,
    /// Exclusive upper bound on `modified_at`; `-1` for none.
    pub before: i64,
    /// Exclusive lower bound on `modified_at`; `-1` for none.
    pub after: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            length: UNBOUNDED,
            before: UNBOUNDED,
            after: UNBOUNDED,
        }
    }
}

/// Applies the window to a user's messages.
///
/// Messages are ordered most-recent-first by `modified_at`; equal
/// timestamps are broken by descending id so the newest message wins
/// deterministically. When both bounds are given and `after >= before`
/// the window is empty by definition — callers surface that as the
/// ordinary empty-result condition, not an error.
#[must_use]
pub fn window(mut messages: Vec<Message>, w: Window) -> Vec<Message> {
    if w.before != UNBOUNDED && w.after != UNBOUNDED && w.after >= w.before {
        return Vec::new();
    }
    messages.retain(|m| {
        (w.after == UNBOUNDED || m.modified_at > w.after)
            && (w.before == UNBOUNDED || m.modified_at < w.before)
    });
    messages.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| b.id.number().cmp(&a.id.number()))
    });
    if w.length != UNBOUNDED {
        messages.truncate(usize::try_from(w.length).unwrap_or(0));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::MessageId;

    fn message(n: u64, modified_at: i64) -> Message {
        Message {
            id: MessageId::from_number(n),
            title: format!("m{n}"),
            body: String::new(),
            sender: "AxelW".into(),
            editor: None,
            replyto: None,
            origin_ip: None,
            modified_at,
        }
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn unbounded_window_returns_all_most_recent_first() {
        let out = window(
            vec![message(1, 100), message(2, 300), message(3, 200)],
            Window::default(),
        );
        assert_eq!(ids(&out), vec!["msg-2", "msg-3", "msg-1"]);
    }

    #[test]
    fn bounds_are_exclusive() {
        let msgs = vec![message(1, 100), message(2, 200), message(3, 300)];
        let out = window(
            msgs.clone(),
            Window {
                after: 100,
                before: 300,
                length: UNBOUNDED,
            },
        );
        assert_eq!(ids(&out), vec!["msg-2"]);

        // Boundary values themselves are excluded.
        let out = window(
            msgs,
            Window {
                after: 200,
                before: 200,
                length: UNBOUNDED,
            },
        );
        assert!(out.is_empty());
    }

    #[test]
    fn inverted_range_is_empty_by_definition() {
        let out = window(
            vec![message(1, 100), message(2, 200)],
            Window {
                after: 500,
                before: 100,
                length: UNBOUNDED,
            },
        );
        assert!(out.is_empty());
    }

    #[test]
    fn length_caps_after_ordering() {
        let out = window(
            vec![message(1, 100), message(2, 300), message(3, 200)],
            Window {
                length: 2,
                ..Window::default()
            },
        );
        assert_eq!(ids(&out), vec!["msg-2", "msg-3"]);
    }

    #[test]
    fn equal_timestamps_prefer_newest_id() {
        let out = window(
            vec![message(1, 100), message(2, 100)],
            Window {
                length: 1,
                ..Window::default()
            },
        );
        assert_eq!(ids(&out), vec!["msg-2"]);
    }

    #[test]
    fn zero_length_yields_nothing() {
        let out = window(
            vec![message(1, 100)],
            Window {
                length: 0,
                ..Window::default()
            },
        );
        assert!(out.is_empty());
    }
}
