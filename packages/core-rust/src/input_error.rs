//! Structured description of a problem with an incoming request.
//!
//! Validation code upstream of the writer returns an [`InputError`] like any
//! other serializable value; the writer gives it no special treatment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Part of the HTTP request an invalid field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    Path,
    Query,
    Header,
    Form,
    Body,
}

impl FieldSource {
    /// Prefix used in [`InputError::fields`] entries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Form => "form",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem with the calling request, addressed to the client.
///
/// Empty or zero fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct InputError {
    /// Locations of the offending input, each `"<source>:<name>"`.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<String>,
    /// Numeric identifier a front end can map to its own message.
    #[serde(skip_serializing_if = "is_zero", default)]
    pub id: i64,
    /// String identifier a front end can map to its own message.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    /// Human-readable explanation.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(id: &i64) -> bool {
    *id == 0
}

impl InputError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends `"<source>:<name>"` to [`Self::fields`].
    #[must_use]
    pub fn with_field(mut self, source: FieldSource, name: &str) -> Self {
        self.fields.push(format!("{source}:{name}"));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_message() {
        let err = InputError::new("limit must be positive");
        assert_eq!(err.to_string(), "limit must be positive");
    }

    #[test]
    fn with_field_prefixes_source() {
        let err = InputError::new("bad")
            .with_field(FieldSource::Query, "limit")
            .with_field(FieldSource::Body, "items");
        assert_eq!(err.fields, vec!["query:limit", "body:items"]);
    }

    #[test]
    fn empty_fields_are_omitted() {
        let json = serde_json::to_value(InputError::new("oops")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "oops" }));
    }

    #[test]
    fn full_wire_shape() {
        let err = InputError::new("missing name")
            .with_id(17)
            .with_name("missing-name")
            .with_field(FieldSource::Form, "name");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": ["form:name"],
                "id": 17,
                "name": "missing-name",
                "message": "missing name",
            })
        );
    }

    #[test]
    fn decodes_with_missing_fields() {
        let err: InputError = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(err.id, 3);
        assert!(err.fields.is_empty());
        assert!(err.message.is_empty());
    }

    #[test]
    fn field_source_serializes_lowercase() {
        let json = serde_json::to_value(FieldSource::Header).unwrap();
        assert_eq!(json, serde_json::json!("header"));
    }
}
