use async_trait::async_trait;
use glimpse_core::{
    models::{ArtifactRecord, NewArtifact},
    AppError,
};
use sqlx::{PgPool, Postgres};

/// Metadata store for artifact records
///
/// Records are append-only: inserted once and listed newest first.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a record. `created_at` and `id` are assigned by the store.
    async fn insert(&self, artifact: NewArtifact) -> Result<ArtifactRecord, AppError>;

    /// All records ordered by `created_at` descending, ties broken by `id` descending.
    async fn list_recent(&self) -> Result<Vec<ArtifactRecord>, AppError>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<(), AppError>;
}

/// Repository for the `image_metadata` table
#[derive(Clone)]
pub struct PgArtifactRepository {
    pool: PgPool,
}

impl PgArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ArtifactStore for PgArtifactRepository {
    #[tracing::instrument(
        skip(self, artifact),
        fields(db.table = "image_metadata", db.operation = "insert", storage_key = %artifact.storage_key)
    )]
    async fn insert(&self, artifact: NewArtifact) -> Result<ArtifactRecord, AppError> {
        let record = sqlx::query_as::<Postgres, ArtifactRecord>(
            r#"
            INSERT INTO image_metadata (file_name, s3_key, description)
            VALUES ($1, $2, $3)
            RETURNING id, file_name, s3_key, description, created_at
            "#,
        )
        .bind(&artifact.file_name)
        .bind(&artifact.storage_key)
        .bind(&artifact.caption)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = record.id, "Artifact record inserted");

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_metadata", db.operation = "select"))]
    async fn list_recent(&self) -> Result<Vec<ArtifactRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, ArtifactRecord>(
            "SELECT id, file_name, s3_key, description, created_at FROM image_metadata ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
