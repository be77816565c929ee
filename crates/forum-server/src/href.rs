//! Canonical resource URLs.
//!
//! Link targets and `Location` headers are always built here so that
//! representation builders stay pure functions of (entity, urls) and the
//! route table stays the single source of path layout.

use forum_core::MessageId;

/// Mount point of the API.
pub const API_ROOT: &str = "/forum/api";

/// URL of the messages collection.
#[must_use]
pub fn messages() -> String {
    format!("{API_ROOT}/messages/")
}

/// URL of a single message.
#[must_use]
pub fn message(id: &MessageId) -> String {
    format!("{API_ROOT}/messages/{id}")
}

/// URL of the users collection.
#[must_use]
pub fn users() -> String {
    format!("{API_ROOT}/users/")
}

/// URL of a single user.
#[must_use]
pub fn user(nickname: &str) -> String {
    format!("{API_ROOT}/users/{nickname}")
}

/// URL of a user's public profile.
#[must_use]
pub fn public_profile(nickname: &str) -> String {
    format!("{API_ROOT}/users/{nickname}/public-profile")
}

/// URL of a user's restricted profile.
#[must_use]
pub fn restricted_profile(nickname: &str) -> String {
    format!("{API_ROOT}/users/{nickname}/restricted-profile")
}

/// URL of a user's message history.
#[must_use]
pub fn history(nickname: &str) -> String {
    format!("{API_ROOT}/users/{nickname}/history")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_rooted() {
        let id = MessageId::from_number(4);
        assert_eq!(message(&id), "/forum/api/messages/msg-4");
        assert_eq!(messages(), "/forum/api/messages/");
        assert_eq!(user("AxelW"), "/forum/api/users/AxelW");
        assert_eq!(history("AxelW"), "/forum/api/users/AxelW/history");
        assert_eq!(
            restricted_profile("AxelW"),
            "/forum/api/users/AxelW/restricted-profile"
        );
    }
}
