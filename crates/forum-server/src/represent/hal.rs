//! HAL+JSON envelopes.
//!
//! `http://stateless.co/hal_specification.html`: entity attributes live at
//! the top level next to a reserved `_links` map. Relation names outside
//! the registered set are namespaced through `curies`. A link whose `href`
//! is `null` states that the relation exists but is not applicable to
//! this entity (anonymous author, message without a parent) — the key is
//! never simply omitted.

use forum_core::{Message, User, ANONYMOUS};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::fields;
use crate::href;
use crate::media::{ATOM_THREAD_PROFILE, COLLECTION_JSON, FORUM_MESSAGE_PROFILE, FORUM_USER_PROFILE, HAL_JSON};
use crate::represent::collection;

// ============================================================================
// Wire types
// ============================================================================

/// A compact URI prefix declaration.
#[derive(Debug, Serialize)]
pub struct Curie {
    pub name: &'static str,
    pub href: String,
    pub templated: bool,
}

impl Curie {
    fn new(name: &'static str, profile: &str) -> Self {
        Self {
            name,
            href: format!("{profile}/{{rels}}"),
            templated: true,
        }
    }
}

/// A HAL link value. `href: None` serializes to `null`.
#[derive(Debug, Serialize)]
pub struct HalLink {
    pub href: Option<String>,
    pub profile: &'static str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
}

impl HalLink {
    fn plain(href: impl Into<String>, profile: &'static str) -> Self {
        Self {
            href: Some(href.into()),
            profile,
            media_type: None,
        }
    }

    fn typed(href: Option<String>, profile: &'static str, media_type: &'static str) -> Self {
        Self {
            href,
            profile,
            media_type: Some(media_type),
        }
    }
}

/// Accumulates `_links` entries in insertion order.
struct Links(Map<String, Value>);

impl Links {
    fn with_curies(curies: Vec<Curie>) -> Self {
        let mut map = Map::new();
        map.insert("curies".into(), json_value(&curies));
        Self(map)
    }

    fn add(&mut self, rel: &str, link: HalLink) -> &mut Self {
        self.0.insert(rel.to_string(), json_value(&link));
        self
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn json_value<T: Serialize>(value: &T) -> Value {
    // The wire types above contain nothing that can fail to serialize.
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Message envelope
// ============================================================================

/// Envelope for `GET /messages/{id}`.
///
/// Link relations: `self`, `msg:edit`, `msg:delete`, `msg:reply`,
/// `collection`, `msg:author`, `atom-thread:in-reply-to`. The `editor`
/// attribute is omitted entirely when the message was never edited.
#[must_use]
pub fn message_envelope(message: &Message) -> Value {
    let self_url = href::message(&message.id);

    let mut links = Links::with_curies(vec![
        Curie::new("msg", FORUM_MESSAGE_PROFILE),
        Curie::new("atom-thread", ATOM_THREAD_PROFILE),
    ]);
    links
        .add("self", HalLink::plain(&self_url, FORUM_MESSAGE_PROFILE))
        .add("msg:edit", HalLink::plain(&self_url, FORUM_MESSAGE_PROFILE))
        .add(
            "msg:delete",
            HalLink::plain(&self_url, FORUM_MESSAGE_PROFILE),
        )
        .add(
            "collection",
            HalLink::typed(
                Some(href::messages()),
                FORUM_MESSAGE_PROFILE,
                COLLECTION_JSON,
            ),
        )
        .add("msg:reply", HalLink::plain(&self_url, FORUM_MESSAGE_PROFILE))
        .add(
            "msg:author",
            HalLink::typed(author_href(message), FORUM_USER_PROFILE, HAL_JSON),
        )
        .add(
            "atom-thread:in-reply-to",
            HalLink::typed(
                message.replyto.as_ref().map(href::message),
                FORUM_MESSAGE_PROFILE,
                HAL_JSON,
            ),
        );

    let mut envelope = Map::new();
    envelope.insert("_links".into(), links.into_value());
    envelope.insert(
        "template".into(),
        json_value(&collection::template(fields::MESSAGE_TEMPLATE)),
    );
    envelope.insert("headline".into(), Value::String(message.title.clone()));
    envelope.insert("articleBody".into(), Value::String(message.body.clone()));
    envelope.insert("author".into(), Value::String(message.sender.clone()));
    if let Some(editor) = &message.editor {
        envelope.insert("editor".into(), Value::String(editor.clone()));
    }
    Value::Object(envelope)
}

fn author_href(message: &Message) -> Option<String> {
    if message.sender == ANONYMOUS {
        None
    } else {
        Some(href::user(&message.sender))
    }
}

// ============================================================================
// Profile envelopes
// ============================================================================

/// Envelope for `GET /users/{nickname}/public-profile`.
#[must_use]
pub fn public_profile_envelope(user: &User) -> Value {
    let nickname = &user.nickname;

    let mut links = Links::with_curies(vec![Curie::new("user", FORUM_USER_PROFILE)]);
    links
        .add(
            "self",
            HalLink::plain(href::public_profile(nickname), FORUM_USER_PROFILE),
        )
        .add(
            "user:parent",
            HalLink::typed(Some(href::user(nickname)), FORUM_USER_PROFILE, HAL_JSON),
        )
        .add(
            "user:private-data",
            HalLink::typed(
                Some(href::restricted_profile(nickname)),
                FORUM_USER_PROFILE,
                HAL_JSON,
            ),
        )
        .add(
            "user:edit",
            HalLink::typed(
                Some(href::public_profile(nickname)),
                FORUM_USER_PROFILE,
                COLLECTION_JSON,
            ),
        )
        .add(
            "user:messages",
            HalLink::typed(
                Some(href::history(nickname)),
                FORUM_MESSAGE_PROFILE,
                COLLECTION_JSON,
            ),
        );

    let mut envelope = Map::new();
    envelope.insert("_links".into(), links.into_value());
    envelope.insert("nickname".into(), Value::String(nickname.clone()));
    envelope.insert(
        "registrationdate".into(),
        Value::from(user.registration_date),
    );
    envelope.insert(
        "signature".into(),
        Value::String(user.public_profile.signature.clone()),
    );
    envelope.insert(
        "avatar".into(),
        Value::String(user.public_profile.avatar.clone()),
    );
    envelope.insert(
        "template".into(),
        json_value(&collection::template(fields::PUBLIC_PROFILE_EDIT)),
    );
    Value::Object(envelope)
}

/// Envelope for `GET /users/{nickname}/restricted-profile`.
///
/// Optional attributes render as `null` rather than disappearing, so the
/// attribute set is stable across users.
#[must_use]
pub fn restricted_profile_envelope(user: &User) -> Value {
    let nickname = &user.nickname;
    let p = &user.restricted_profile;

    let mut links = Links::with_curies(vec![Curie::new("user", FORUM_USER_PROFILE)]);
    links
        .add(
            "self",
            HalLink::plain(href::restricted_profile(nickname), FORUM_USER_PROFILE),
        )
        .add(
            "user:parent",
            HalLink::typed(Some(href::user(nickname)), FORUM_USER_PROFILE, HAL_JSON),
        )
        .add(
            "user:public-data",
            HalLink::typed(
                Some(href::public_profile(nickname)),
                FORUM_USER_PROFILE,
                HAL_JSON,
            ),
        )
        .add(
            "user:edit",
            HalLink::typed(
                Some(href::restricted_profile(nickname)),
                FORUM_USER_PROFILE,
                COLLECTION_JSON,
            ),
        )
        .add(
            "user:messages",
            HalLink::typed(
                Some(href::history(nickname)),
                FORUM_MESSAGE_PROFILE,
                COLLECTION_JSON,
            ),
        );

    let mut envelope = Map::new();
    envelope.insert("_links".into(), links.into_value());
    envelope.insert("nickname".into(), Value::String(nickname.clone()));
    envelope.insert("address".into(), opt(&p.residence));
    envelope.insert("birthday".into(), Value::String(p.birthday.clone()));
    envelope.insert("email".into(), Value::String(p.email.clone()));
    envelope.insert("familyName".into(), Value::String(p.lastname.clone()));
    envelope.insert("gender".into(), Value::String(p.gender.clone()));
    envelope.insert("givenName".into(), Value::String(p.firstname.clone()));
    envelope.insert("website".into(), opt(&p.website));
    envelope.insert("telephone".into(), opt(&p.mobile));
    envelope.insert("skype".into(), opt(&p.skype));
    envelope.insert("image".into(), opt(&p.picture));
    envelope.insert(
        "template".into(),
        json_value(&collection::template(fields::RESTRICTED_PROFILE_EDIT)),
    );
    Value::Object(envelope)
}

fn opt(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map(|v| Value::String(v.clone()))
        .unwrap_or(Value::Null)
}
