/**
 * PostgreSQL Note Store
 *
 * Notes live in a single `notes` table with one JSONB document of fields per
 * row. Partial updates use the JSONB concatenation operator, so merging a
 * patch is one atomic statement rather than a read-modify-write round trip.
 */

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::notes::schema::NoteSchema;
use crate::backend::notes::store::NoteStore;
use crate::shared::{Fields, Note, NoteId};

/// Maximum pooled connections
const MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a pooled connection before giving up
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: Uuid,
    fields: Json<Fields>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note::new(NoteId::from_uuid(row.id), row.fields.0)
    }
}

/// Note store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgNoteStore {
    pool: PgPool,
    schema: NoteSchema,
}

impl PgNoteStore {
    /// Connect to the database and run pending migrations
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `schema` - Collection schema enforced on writes
    ///
    /// # Errors
    /// `StoreUnavailable` if the database cannot be reached, `QueryFailed` if
    /// a migration fails.
    pub async fn connect(database_url: &str, schema: NoteSchema) -> BackendResult<Self> {
        tracing::info!("Connecting to note database...");

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;

        tracing::info!("Database connection pool created successfully");

        let store = Self::from_pool(pool, schema);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool without running migrations
    pub fn from_pool(pool: PgPool, schema: NoteSchema) -> Self {
        Self { pool, schema }
    }

    /// Run embedded migrations
    pub async fn migrate(&self) -> BackendResult<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!().run(&self.pool).await?;
        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> BackendResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, fields
            FROM notes
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn insert(&self, fields: Fields) -> BackendResult<Note> {
        self.schema.validate_new(&fields)?;

        let id = NoteId::new();
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes (id, fields)
            VALUES ($1, $2)
            RETURNING id, fields
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&fields))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn merge(&self, id: NoteId, patch: Fields) -> BackendResult<Note> {
        self.schema.validate_patch(&patch)?;

        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes
            SET fields = fields || $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, fields
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Note::from).ok_or(BackendError::NotFound(id))
    }

    async fn remove(&self, id: NoteId) -> BackendResult<Option<Note>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            DELETE FROM notes
            WHERE id = $1
            RETURNING id, fields
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Note::from))
    }

    async fn close(&self) {
        tracing::info!("Closing note database pool");
        self.pool.close().await;
    }
}
