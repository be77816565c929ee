//! Collection+JSON envelopes.
//!
//! `http://amundsen.com/media-types/collection/` with the template
//! validation and value-types extensions. The `template` always describes
//! the write schema of the resource, independent of the items currently
//! in the collection; clients discover what they may POST from it.

use forum_core::{Message, User};
use serde::Serialize;
use serde_json::Value;

use crate::fields::{self, FieldKind, FieldSpec};
use crate::href;

// ============================================================================
// Wire types
// ============================================================================

/// Top-level Collection+JSON document.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub collection: Collection,
}

#[derive(Debug, Serialize)]
pub struct Collection {
    pub version: &'static str,
    pub href: String,
    pub links: Vec<Link>,
    pub template: Template,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries: Option<Vec<Query>>,
}

/// A collection-level or item-level link.
#[derive(Debug, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'static str>,
    pub rel: &'static str,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Item {
    pub href: String,
    #[serde(rename = "read-only", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    pub data: Vec<DataPair>,
    pub links: Vec<Link>,
}

/// One `{name, value}` pair of an item.
#[derive(Debug, Serialize)]
pub struct DataPair {
    pub name: &'static str,
    pub value: Value,
}

/// The write schema of the collection.
#[derive(Debug, Serialize)]
pub struct Template {
    pub data: Vec<TemplateField>,
}

/// One writable field descriptor. Scalar fields carry an empty `value`,
/// the address field an empty `object`, mirroring the wire form clients
/// send back.
#[derive(Debug, Serialize)]
pub struct TemplateField {
    pub prompt: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
    pub required: bool,
}

/// A registered query (the history search form).
#[derive(Debug, Serialize)]
pub struct Query {
    pub href: String,
    pub rel: &'static str,
    pub prompt: &'static str,
    pub data: Vec<TemplateField>,
}

/// Renders a field table as a Collection+JSON template.
#[must_use]
pub fn template(specs: &[FieldSpec]) -> Template {
    Template {
        data: specs.iter().map(template_field).collect(),
    }
}

fn template_field(spec: &FieldSpec) -> TemplateField {
    let (value, object) = match spec.kind {
        FieldKind::Scalar => (Some(""), None),
        FieldKind::Address => (None, Some(Value::Object(Default::default()))),
    };
    TemplateField {
        prompt: spec.prompt,
        name: spec.name,
        value,
        object,
        required: spec.required,
    }
}

// ============================================================================
// Message collections
// ============================================================================

fn message_item(message: &Message) -> Item {
    Item {
        href: href::message(&message.id),
        read_only: None,
        data: vec![DataPair {
            name: "headline",
            value: Value::String(message.title.clone()),
        }],
        links: Vec::new(),
    }
}

/// Envelope for `GET /messages/`.
#[must_use]
pub fn messages_envelope(messages: &[Message]) -> Envelope {
    Envelope {
        collection: Collection {
            version: "1.0",
            href: href::messages(),
            links: vec![Link {
                prompt: Some("List of all users in the Forum"),
                rel: "users-all",
                href: href::users(),
                name: None,
            }],
            template: template(fields::MESSAGE_TEMPLATE),
            items: messages.iter().map(message_item).collect(),
            queries: None,
        },
    }
}

/// Envelope for `GET /users/{nickname}/history`. Carries the search query
/// descriptors so clients can discover the window parameters.
#[must_use]
pub fn history_envelope(nickname: &str, messages: &[Message]) -> Envelope {
    Envelope {
        collection: Collection {
            version: "1.0",
            href: href::history(nickname),
            links: vec![
                Link {
                    prompt: Some("List of all messages in the Forum"),
                    rel: "messages-all",
                    href: href::messages(),
                    name: None,
                },
                Link {
                    prompt: Some("User's profile"),
                    rel: "author",
                    href: href::user(nickname),
                    name: None,
                },
            ],
            template: template(fields::MESSAGE_TEMPLATE),
            items: messages.iter().map(message_item).collect(),
            queries: Some(vec![history_query(nickname)]),
        },
    }
}

fn history_query(nickname: &str) -> Query {
    let scalar = |prompt, name| TemplateField {
        prompt,
        name,
        value: Some(""),
        object: None,
        required: false,
    };
    Query {
        href: href::history(nickname),
        rel: "search",
        prompt: "Search in the user history",
        data: vec![
            scalar(
                "Return the messages published after this timestamp",
                "after",
            ),
            scalar(
                "Return the messages published before this timestamp",
                "before",
            ),
            scalar("Limit the number of messages returned", "length"),
        ],
    }
}

// ============================================================================
// User collections
// ============================================================================

/// Envelope for `GET /users/`.
#[must_use]
pub fn users_envelope(users: &[User]) -> Envelope {
    Envelope {
        collection: Collection {
            version: "1.0",
            href: href::users(),
            links: vec![Link {
                prompt: Some("List of all messages in the Forum"),
                rel: "messages-all",
                href: href::messages(),
                name: None,
            }],
            template: template(fields::USER_CREATE),
            items: users.iter().map(user_item).collect(),
            queries: None,
        },
    }
}

fn user_item(user: &User) -> Item {
    Item {
        href: href::user(&user.nickname),
        read_only: Some(true),
        data: vec![
            DataPair {
                name: "nickname",
                value: Value::String(user.nickname.clone()),
            },
            DataPair {
                name: "registrationdate",
                value: Value::from(user.registration_date),
            },
        ],
        links: vec![Link {
            prompt: Some("History of user"),
            rel: "messages",
            href: href::history(&user.nickname),
            name: Some("history"),
        }],
    }
}
