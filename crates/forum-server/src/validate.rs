//! Request body validation and content negotiation.
//!
//! Parsing is an explicit contract, not exception control flow: every step
//! returns a typed [`ValidationError`] that the controller converts into an
//! [`ApiError`] with its own resource context.
//!
//! The pipeline, in order (the ordering is part of the API contract):
//! 1. `Content-Type` must equal the resource's declared input media type
//!    exactly — no parameters, no wildcards.
//! 2. The body must parse as JSON.
//! 3. The document must contain a `template.data` array of descriptors.
//! 4. Descriptors are folded through a [`FieldSpec`] table; unknown names
//!    are ignored for forward compatibility, and missing mandatory fields
//!    fail the request.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::fields::{FieldKind, FieldSpec};

// ============================================================================
// Errors
// ============================================================================

/// Typed validation failure; carries no resource context of its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Content-Type missing or not the declared input media type.
    #[error("use media type {expected}")]
    MediaType { expected: &'static str },

    /// Body is not parseable JSON.
    #[error("request body is not valid JSON")]
    Unparsable,

    /// Parsed, but the Collection+JSON `template.data` structure is absent
    /// or wrongly shaped.
    #[error("you must embed the data in a Collection+JSON template")]
    NotTemplate,

    /// The `address` descriptor object lacks a mandatory key.
    #[error("incorrect format of address field")]
    MalformedAddress,

    /// A mandatory descriptor is absent or empty.
    #[error("be sure you include mandatory property {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Attaches resource context, producing the API-level error.
    pub fn into_api(self, resource_type: &'static str, resource_url: impl Into<String>) -> ApiError {
        let resource_url = resource_url.into();
        let message = self.to_string();
        match self {
            Self::MediaType { .. } => ApiError::UnsupportedMediaType {
                resource_type,
                resource_url,
                message,
            },
            Self::Unparsable => ApiError::MalformedBody {
                resource_type,
                resource_url,
                message,
                unparsable: true,
            },
            Self::NotTemplate | Self::MalformedAddress => ApiError::MalformedBody {
                resource_type,
                resource_url,
                message,
                unparsable: false,
            },
            Self::MissingField(_) => ApiError::MissingField {
                resource_type,
                resource_url,
                message,
            },
        }
    }
}

// ============================================================================
// Content negotiation
// ============================================================================

/// Checks the `Content-Type` header against the declared input media type.
/// Exact string equality: `application/vnd.collection+json;charset=utf-8`
/// does not match.
pub fn check_content_type(
    headers: &HeaderMap,
    expected: &'static str,
) -> Result<(), ValidationError> {
    let actual = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if actual == expected {
        Ok(())
    } else {
        Err(ValidationError::MediaType { expected })
    }
}

// ============================================================================
// Template parsing
// ============================================================================

/// One `template.data` descriptor as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub object: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TemplateDocument {
    template: TemplateData,
}

#[derive(Debug, Deserialize)]
struct TemplateData {
    data: Vec<Descriptor>,
}

/// Parses a raw body into template descriptors.
///
/// Distinguishes "not JSON at all" (415) from "JSON without the expected
/// template structure" (400).
pub fn parse_template(body: &[u8]) -> Result<Vec<Descriptor>, ValidationError> {
    if body.is_empty() {
        return Err(ValidationError::Unparsable);
    }
    let document: Value =
        serde_json::from_slice(body).map_err(|_| ValidationError::Unparsable)?;
    let document: TemplateDocument =
        serde_json::from_value(document).map_err(|_| ValidationError::NotTemplate)?;
    Ok(document.template.data)
}

// ============================================================================
// Field extraction
// ============================================================================

/// Validated fields, keyed by wire name.
#[derive(Debug, Default)]
pub struct FieldMap(HashMap<&'static str, String>);

impl FieldMap {
    /// The field's value, if it was present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The field's value as an owned string, if present.
    #[must_use]
    pub fn get_owned(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    /// A mandatory field. The extractor has already enforced presence, so
    /// this never fails on a map it produced.
    #[must_use]
    pub fn required(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }
}

/// Folds wire descriptors through a field table.
///
/// Unknown descriptor names are ignored. Empty string values count as
/// absent, so a mandatory field submitted as `""` fails like a missing
/// one.
pub fn extract(
    specs: &'static [FieldSpec],
    descriptors: &[Descriptor],
) -> Result<FieldMap, ValidationError> {
    let mut map = HashMap::new();
    for spec in specs {
        let descriptor = descriptors.iter().find(|d| d.name == spec.name);
        let value = match descriptor {
            Some(d) => extract_one(spec, d)?,
            None => None,
        };
        match value {
            Some(v) => {
                map.insert(spec.name, v);
            }
            None if spec.required => return Err(ValidationError::MissingField(spec.name)),
            None => {}
        }
    }
    Ok(FieldMap(map))
}

fn extract_one(spec: &FieldSpec, d: &Descriptor) -> Result<Option<String>, ValidationError> {
    match spec.kind {
        FieldKind::Scalar => Ok(scalar_value(d.value.as_ref())),
        FieldKind::Address => address_value(d),
    }
}

fn scalar_value(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// The address form: a `{addressLocality, addressCountry}` object joined
/// as `<locality>,<country>`, or a pre-joined string value.
fn address_value(d: &Descriptor) -> Result<Option<String>, ValidationError> {
    if let Some(object) = d.object.as_ref().filter(|o| !o.is_null()) {
        let locality = object
            .get("addressLocality")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MalformedAddress)?;
        let country = object
            .get("addressCountry")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MalformedAddress)?;
        return Ok(Some(format!("{locality},{country}")));
    }
    Ok(scalar_value(d.value.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn descriptors(value: Value) -> Vec<Descriptor> {
        parse_template(value.to_string().as_bytes()).unwrap()
    }

    fn template(data: Value) -> Vec<Descriptor> {
        descriptors(json!({"template": {"data": data}}))
    }

    #[test]
    fn content_type_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.collection+json"),
        );
        assert!(check_content_type(&headers, "application/vnd.collection+json").is_ok());

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.collection+json; charset=utf-8"),
        );
        assert!(check_content_type(&headers, "application/vnd.collection+json").is_err());

        let empty = HeaderMap::new();
        assert!(check_content_type(&empty, "application/vnd.collection+json").is_err());
    }

    #[test]
    fn unparsable_body_is_distinguished_from_wrong_shape() {
        assert_eq!(
            parse_template(b"not json").unwrap_err(),
            ValidationError::Unparsable
        );
        assert_eq!(parse_template(b"").unwrap_err(), ValidationError::Unparsable);
        assert_eq!(
            parse_template(br#"{"headline": "no template"}"#).unwrap_err(),
            ValidationError::NotTemplate
        );
        assert_eq!(
            parse_template(br#"{"template": {}}"#).unwrap_err(),
            ValidationError::NotTemplate
        );
    }

    #[test]
    fn extracts_known_fields_and_ignores_unknown() {
        let data = template(json!([
            {"name": "headline", "value": "Hypermedia course"},
            {"name": "articleBody", "value": "Do you know any?"},
            {"name": "mystery", "value": "ignored"}
        ]));
        let map = extract(fields::MESSAGE_CREATE, &data).unwrap();
        assert_eq!(map.get("headline"), Some("Hypermedia course"));
        assert_eq!(map.get("articleBody"), Some("Do you know any?"));
        assert_eq!(map.get("author"), None);
        assert_eq!(map.get("mystery"), None);
    }

    #[test]
    fn missing_mandatory_field_fails() {
        let data = template(json!([{"name": "headline", "value": "only a title"}]));
        let err = extract(fields::MESSAGE_CREATE, &data).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("articleBody"));
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let data = template(json!([
            {"name": "headline", "value": ""},
            {"name": "articleBody", "value": "body"}
        ]));
        let err = extract(fields::MESSAGE_CREATE, &data).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("headline"));
    }

    #[test]
    fn address_object_is_joined() {
        let data = template(json!([
            {"name": "address", "object": {"addressLocality": "Oulu", "addressCountry": "Finland"}},
            {"name": "birthday", "value": "1990-01-01"},
            {"name": "email", "value": "a@b.c"},
            {"name": "familyName", "value": "W"},
            {"name": "gender", "value": "male"},
            {"name": "givenName", "value": "Axel"}
        ]));
        let map = extract(fields::RESTRICTED_PROFILE_EDIT, &data).unwrap();
        assert_eq!(map.get("address"), Some("Oulu,Finland"));
    }

    #[test]
    fn address_string_form_is_accepted() {
        let data = template(json!([
            {"name": "address", "value": "Oulu,Finland"},
            {"name": "birthday", "value": "1990-01-01"},
            {"name": "email", "value": "a@b.c"},
            {"name": "familyName", "value": "W"},
            {"name": "gender", "value": "male"},
            {"name": "givenName", "value": "Axel"}
        ]));
        let map = extract(fields::RESTRICTED_PROFILE_EDIT, &data).unwrap();
        assert_eq!(map.get("address"), Some("Oulu,Finland"));
    }

    #[test]
    fn address_object_missing_key_is_malformed() {
        let data = template(json!([
            {"name": "address", "object": {"addressLocality": "Oulu"}},
            {"name": "birthday", "value": "1990-01-01"},
            {"name": "email", "value": "a@b.c"},
            {"name": "familyName", "value": "W"},
            {"name": "gender", "value": "male"},
            {"name": "givenName", "value": "Axel"}
        ]));
        let err = extract(fields::RESTRICTED_PROFILE_EDIT, &data).unwrap_err();
        assert_eq!(err, ValidationError::MalformedAddress);
    }

    #[test]
    fn validation_errors_map_to_statuses() {
        use axum::http::StatusCode;
        let cases = [
            (
                ValidationError::MediaType {
                    expected: "application/vnd.collection+json",
                },
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (ValidationError::Unparsable, StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ValidationError::NotTemplate, StatusCode::BAD_REQUEST),
            (ValidationError::MalformedAddress, StatusCode::BAD_REQUEST),
            (
                ValidationError::MissingField("headline"),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(
                err.into_api("Message", "/forum/api/messages/").status_code(),
                status
            );
        }
    }
}
