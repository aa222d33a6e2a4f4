//! Annotation row model and search response.

use annostore_core::annotation::AnnotationContent;
use annostore_core::types::{DbId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// A row from the `annotations` table.
///
/// `ranges`, `tags` and `permissions` are stored as JSON text and decoded
/// here, so the serialized form carries them as nested structures again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub id: DbId,
    #[serde(flatten)]
    pub content: AnnotationContent,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Annotation {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let ranges: String = row.try_get("ranges")?;
        let tags: Option<String> = row.try_get("tags")?;
        let permissions: Option<String> = row.try_get("permissions")?;

        Ok(Self {
            id: row.try_get("id")?,
            content: AnnotationContent {
                annotator_schema_version: row.try_get("annotator_schema_version")?,
                text: row.try_get("text")?,
                quote: row.try_get("quote")?,
                uri: row.try_get("uri")?,
                ranges: decode_column("ranges", &ranges)?,
                user: row.try_get("user")?,
                consumer: row.try_get("consumer")?,
                tags: tags.map(|raw| decode_column("tags", &raw)).transpose()?,
                permissions: permissions
                    .map(|raw| decode_column("permissions", &raw))
                    .transpose()?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Decode a JSON text column, reporting failures as a column decode error.
fn decode_column<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Encode a structured value into the JSON text stored in the table.
pub(crate) fn encode_column<T: Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Result of a search by URI.
///
/// `total` is always present, including when no rows matched; the annotator
/// client relies on it to restore annotations on page reload.
#[derive(Debug, Serialize)]
pub struct AnnotationSearchResults {
    pub total: usize,
    pub rows: Vec<Annotation>,
}

impl From<Vec<Annotation>> for AnnotationSearchResults {
    fn from(rows: Vec<Annotation>) -> Self {
        Self {
            total: rows.len(),
            rows,
        }
    }
}
