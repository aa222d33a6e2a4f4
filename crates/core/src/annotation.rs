//! Annotation content, the whitelisted incoming field set, and merge rules.
//!
//! The store treats every client-owned field as opaque. The only structure it
//! keeps is the nested `ranges` list, whose entries are trimmed to four keys
//! and otherwise come back out exactly as they went in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Where an annotation's quote is anchored inside the annotated document.
///
/// Clients send node paths for `start`/`end` (e.g. `/p[1]`) and character
/// offsets, but none of the four values is checked. Keys outside these four
/// are dropped; keys that were not sent are not written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<Value>,
}

// ---------------------------------------------------------------------------
// Incoming fields
// ---------------------------------------------------------------------------

/// The permitted field set accepted by create and update.
///
/// Each field is `None` when the key was absent, `Some(None)` when it was
/// sent as `null`, and `Some(Some(_))` otherwise. Keys outside the whitelist,
/// including a client-supplied `id`, `created_at` or `updated_at`, are
/// ignored; the server owns those values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnnotationFields {
    #[serde(default, deserialize_with = "submitted")]
    pub annotator_schema_version: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub quote: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub uri: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub ranges: Option<Option<Vec<Range>>>,
    #[serde(default, deserialize_with = "submitted")]
    pub user: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub consumer: Option<Option<String>>,
    #[serde(default, deserialize_with = "submitted")]
    pub tags: Option<Option<Value>>,
    #[serde(default, deserialize_with = "submitted")]
    pub permissions: Option<Option<Value>>,
}

/// Wrap any key that is present, `null` included, in `Some`. Absent keys fall
/// back to `None` through `#[serde(default)]`.
fn submitted<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Stored content
// ---------------------------------------------------------------------------

/// The client-owned columns of an annotation.
///
/// `id` and the timestamps are assigned by storage and live on the row
/// model, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationContent {
    pub annotator_schema_version: Option<String>,
    pub text: Option<String>,
    pub quote: Option<String>,
    pub uri: Option<String>,
    pub ranges: Vec<Range>,
    pub user: Option<String>,
    pub consumer: Option<String>,
    pub tags: Option<Value>,
    pub permissions: Option<Value>,
}

impl AnnotationContent {
    /// Build the content of a brand-new annotation. Missing or `null`
    /// `ranges` become an empty list.
    pub fn from_fields(fields: AnnotationFields) -> Self {
        Self {
            annotator_schema_version: fields.annotator_schema_version.flatten(),
            text: fields.text.flatten(),
            quote: fields.quote.flatten(),
            uri: fields.uri.flatten(),
            ranges: fields.ranges.flatten().unwrap_or_default(),
            user: fields.user.flatten(),
            consumer: fields.consumer.flatten(),
            tags: fields.tags.flatten(),
            permissions: fields.permissions.flatten(),
        }
    }

    /// Produce a new record with every submitted field in `fields`
    /// overwriting the current value. A field sent as `null` is cleared;
    /// absent fields keep what is stored.
    pub fn merge(&self, fields: &AnnotationFields) -> Self {
        Self {
            annotator_schema_version: pick(
                &fields.annotator_schema_version,
                &self.annotator_schema_version,
            ),
            text: pick(&fields.text, &self.text),
            quote: pick(&fields.quote, &self.quote),
            uri: pick(&fields.uri, &self.uri),
            ranges: match &fields.ranges {
                Some(ranges) => ranges.clone().unwrap_or_default(),
                None => self.ranges.clone(),
            },
            user: pick(&fields.user, &self.user),
            consumer: pick(&fields.consumer, &self.consumer),
            tags: pick(&fields.tags, &self.tags),
            permissions: pick(&fields.permissions, &self.permissions),
        }
    }
}

fn pick<T: Clone>(incoming: &Option<Option<T>>, current: &Option<T>) -> Option<T> {
    match incoming {
        Some(value) => value.clone(),
        None => current.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
