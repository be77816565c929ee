//! Writable field descriptors, shared by the validator and the builders.
//!
//! Each mutating operation is described by one flat table of
//! [`FieldSpec`]s. The validator consumes the table to extract and check
//! incoming template data; the representation builders consume the same
//! table to render the Collection+JSON write `template`, so the read and
//! write vocabularies cannot drift apart.
//!
//! Wire names follow the schema.org-flavoured vocabulary of the API
//! (`headline`, `articleBody`, `givenName`, …); the mapping to domain
//! field names (`title`, `body`, `firstname`, …) happens in the
//! controllers and builders, consistently in both directions.

/// How a descriptor's payload is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain string `value`.
    Scalar,
    /// The `address` form: either a pre-joined string `value` or an
    /// `{addressLocality, addressCountry}` object.
    Address,
}

/// One writable field of an operation.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name of the descriptor.
    pub name: &'static str,
    /// Prompt shown in rendered templates.
    pub prompt: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn scalar(name: &'static str, prompt: &'static str, required: bool) -> Self {
        Self {
            name,
            prompt,
            kind: FieldKind::Scalar,
            required,
        }
    }

    const fn address(name: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            prompt,
            kind: FieldKind::Address,
            required: false,
        }
    }
}

// ============================================================================
// Message operations
// ============================================================================

/// Fields accepted when creating a message or a reply. A missing `author`
/// defaults to the anonymous sentinel.
pub const MESSAGE_CREATE: &[FieldSpec] = &[
    FieldSpec::scalar("headline", "", true),
    FieldSpec::scalar("articleBody", "", true),
    FieldSpec::scalar("author", "", false),
];

/// Fields accepted when editing a message. A missing `editor` defaults to
/// the anonymous sentinel.
pub const MESSAGE_EDIT: &[FieldSpec] = &[
    FieldSpec::scalar("headline", "", true),
    FieldSpec::scalar("articleBody", "", true),
    FieldSpec::scalar("editor", "", false),
];

/// Template rendered on message representations: the union of the create
/// and edit vocabularies.
pub const MESSAGE_TEMPLATE: &[FieldSpec] = &[
    FieldSpec::scalar("headline", "", true),
    FieldSpec::scalar("articleBody", "", true),
    FieldSpec::scalar("author", "", false),
    FieldSpec::scalar("editor", "", false),
];

// ============================================================================
// User operations
// ============================================================================

/// Fields accepted when registering a user.
pub const USER_CREATE: &[FieldSpec] = &[
    FieldSpec::scalar("nickname", "Insert nickname", true),
    FieldSpec::address("address", "Insert user address"),
    FieldSpec::scalar("avatar", "Insert user avatar", true),
    FieldSpec::scalar("birthday", "Insert user birthday", true),
    FieldSpec::scalar("email", "Insert user email", true),
    FieldSpec::scalar("familyName", "Insert user familyName", true),
    FieldSpec::scalar("gender", "Insert user gender", true),
    FieldSpec::scalar("givenName", "Insert user givenName", true),
    FieldSpec::scalar("image", "Insert user image", false),
    FieldSpec::scalar("signature", "Insert user signature", true),
    FieldSpec::scalar("skype", "Insert user skype", false),
    FieldSpec::scalar("telephone", "Insert user telephone", false),
    FieldSpec::scalar("website", "Insert user website", false),
];

/// Fields accepted when replacing the public sub-profile.
pub const PUBLIC_PROFILE_EDIT: &[FieldSpec] = &[
    FieldSpec::scalar("signature", "Insert signature text", true),
    FieldSpec::scalar("avatar", "Insert avatar file name", true),
];

/// Fields accepted when updating the restricted sub-profile. Optional
/// fields left out of the template keep their stored value.
pub const RESTRICTED_PROFILE_EDIT: &[FieldSpec] = &[
    FieldSpec::address("address", "Insert user address"),
    FieldSpec::scalar("birthday", "Insert user birthday", true),
    FieldSpec::scalar("email", "Insert user email", true),
    FieldSpec::scalar("familyName", "Insert user familyName", true),
    FieldSpec::scalar("gender", "Insert user gender", true),
    FieldSpec::scalar("givenName", "Insert user givenName", true),
    FieldSpec::scalar("website", "Insert user website", false),
    FieldSpec::scalar("telephone", "Insert user telephone", false),
    FieldSpec::scalar("skype", "Insert user skype", false),
    FieldSpec::scalar("image", "Insert user image", false),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_create_requires_headline_and_body() {
        let required: Vec<_> = MESSAGE_CREATE
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["headline", "articleBody"]);
    }

    #[test]
    fn user_create_mandatory_set() {
        let required: Vec<_> = USER_CREATE
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(
            required,
            vec![
                "nickname",
                "avatar",
                "birthday",
                "email",
                "familyName",
                "gender",
                "givenName",
                "signature"
            ]
        );
    }

    #[test]
    fn address_is_never_required() {
        for table in [USER_CREATE, RESTRICTED_PROFILE_EDIT] {
            let addr = table.iter().find(|f| f.kind == FieldKind::Address).unwrap();
            assert!(!addr.required);
        }
    }
}
