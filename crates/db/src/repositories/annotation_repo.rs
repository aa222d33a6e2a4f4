//! Repository for the `annotations` table.

use annostore_core::annotation::{AnnotationContent, AnnotationFields};
use annostore_core::types::DbId;
use sqlx::PgPool;

use crate::models::annotation::{encode_column, Annotation};

/// Column list for annotations queries. `user` is a reserved word in
/// PostgreSQL and has to stay quoted.
const COLUMNS: &str = "id, annotator_schema_version, text, quote, uri, ranges, \"user\", \
    consumer, tags, permissions, created_at, updated_at";

/// Provides CRUD and search operations for annotations.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Insert a new annotation, returning the stored row with its assigned
    /// id and timestamps.
    pub async fn create(
        pool: &PgPool,
        content: &AnnotationContent,
    ) -> Result<Annotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotations
                (annotator_schema_version, text, quote, uri, ranges, \"user\",
                 consumer, tags, permissions)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(&content.annotator_schema_version)
            .bind(&content.text)
            .bind(&content.quote)
            .bind(&content.uri)
            .bind(encode_column(&content.ranges)?)
            .bind(&content.user)
            .bind(&content.consumer)
            .bind(content.tags.as_ref().map(encode_column).transpose()?)
            .bind(content.permissions.as_ref().map(encode_column).transpose()?)
            .fetch_one(pool)
            .await
    }

    /// Find an annotation by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every annotation in storage order (ascending id).
    pub async fn list(pool: &PgPool) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations ORDER BY id ASC");
        sqlx::query_as::<_, Annotation>(&query)
            .fetch_all(pool)
            .await
    }

    /// List annotations whose `uri` equals `uri` exactly.
    ///
    /// `None` matches annotations that were stored without a URI.
    pub async fn search_by_uri(
        pool: &PgPool,
        uri: Option<&str>,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        match uri {
            Some(uri) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM annotations
                     WHERE uri = $1
                     ORDER BY id ASC"
                );
                sqlx::query_as::<_, Annotation>(&query)
                    .bind(uri)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM annotations
                     WHERE uri IS NULL
                     ORDER BY id ASC"
                );
                sqlx::query_as::<_, Annotation>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Merge `fields` into an existing annotation.
    ///
    /// The row is locked for the duration of the merge so concurrent updates
    /// to the same id apply one after the other. `updated_at` always moves
    /// forward, even when two updates land within the same clock tick.
    /// Returns `None` if no annotation has this id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &AnnotationFields,
    ) -> Result<Option<Annotation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1 FOR UPDATE");
        let Some(existing) = sqlx::query_as::<_, Annotation>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let merged = existing.content.merge(fields);

        let update = format!(
            "UPDATE annotations SET
                annotator_schema_version = $2,
                text = $3,
                quote = $4,
                uri = $5,
                ranges = $6,
                \"user\" = $7,
                consumer = $8,
                tags = $9,
                permissions = $10,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Annotation>(&update)
            .bind(id)
            .bind(&merged.annotator_schema_version)
            .bind(&merged.text)
            .bind(&merged.quote)
            .bind(&merged.uri)
            .bind(encode_column(&merged.ranges)?)
            .bind(&merged.user)
            .bind(&merged.consumer)
            .bind(merged.tags.as_ref().map(encode_column).transpose()?)
            .bind(merged.permissions.as_ref().map(encode_column).transpose()?)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete an annotation by its ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
