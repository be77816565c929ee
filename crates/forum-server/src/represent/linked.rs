//! Linked-JSON envelopes.
//!
//! A plain-JSON profile: a `links` array of `{rel, href}` controls next to
//! a single named entity object. Used only for the individual user
//! resource, whose payload is deliberately small (the profile subresources
//! carry the actual data).

use forum_core::User;
use serde::Serialize;
use serde_json::{json, Value};

use crate::href;

/// One Linked-JSON link control.
#[derive(Debug, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
}

impl Link {
    fn bare(rel: &'static str, href: String) -> Self {
        Self {
            rel,
            href,
            method: None,
            title: None,
        }
    }

    fn get(rel: &'static str, href: String, title: &'static str) -> Self {
        Self {
            rel,
            href,
            method: Some("GET"),
            title: Some(title),
        }
    }
}

/// Envelope for `GET /users/{nickname}`.
#[must_use]
pub fn user_envelope(user: &User) -> Value {
    let nickname = &user.nickname;
    let links = vec![
        Link {
            rel: "collection",
            href: href::users(),
            method: None,
            title: Some("users"),
        },
        Link::bare("edit", href::user(nickname)),
        Link::bare("self", href::user(nickname)),
        Link::get(
            "public-profile",
            href::public_profile(nickname),
            "Public Profile",
        ),
        Link::get(
            "restricted-profile",
            href::restricted_profile(nickname),
            "Private Profile",
        ),
        Link::get("history", href::history(nickname), "History"),
    ];
    json!({
        "links": links,
        "user": {
            "nickname": nickname,
            "registrationdate": user.registration_date,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::{PublicProfile, RestrictedProfile};
    use serde_json::json;

    fn user() -> User {
        User {
            nickname: "AxelW".into(),
            registration_date: 1362015937,
            public_profile: PublicProfile {
                signature: "sig".into(),
                avatar: "a.png".into(),
            },
            restricted_profile: RestrictedProfile {
                firstname: "Axel".into(),
                lastname: "W".into(),
                email: "a@b.c".into(),
                website: None,
                mobile: None,
                skype: None,
                birthday: "1990-01-01".into(),
                residence: None,
                gender: "male".into(),
                picture: None,
            },
        }
    }

    #[test]
    fn entity_carries_only_public_identity() {
        let v = user_envelope(&user());
        assert_eq!(
            v["user"],
            json!({"nickname": "AxelW", "registrationdate": 1362015937})
        );
    }

    #[test]
    fn links_cover_profiles_and_history() {
        let v = user_envelope(&user());
        let rels: Vec<_> = v["links"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["rel"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            rels,
            vec![
                "collection",
                "edit",
                "self",
                "public-profile",
                "restricted-profile",
                "history"
            ]
        );
        let history = &v["links"][5];
        assert_eq!(history["href"], "/forum/api/users/AxelW/history");
        assert_eq!(history["method"], "GET");
        // Bare links omit the optional members entirely.
        assert!(v["links"][1].get("method").is_none());
        assert!(v["links"][2].get("title").is_none());
    }
}
