use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use veridoc_core::{Document, DocumentId, DocumentStatus, Extraction, Notification, NotificationId, NotificationKind, OwnerId};
use veridoc_store::error::StoreError;
use veridoc_store::store::{DocumentStore, NotificationStore};

use crate::config::PostgresConfig;
use crate::migrations;

/// Build `PgConnectOptions` from a [`PostgresConfig`], applying SSL settings
/// when configured.
pub(crate) fn build_connect_options(
    config: &PostgresConfig,
) -> Result<sqlx::postgres::PgConnectOptions, StoreError> {
    let mut options: sqlx::postgres::PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| StoreError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => sqlx::postgres::PgSslMode::Disable,
            "prefer" => sqlx::postgres::PgSslMode::Prefer,
            "require" => sqlx::postgres::PgSslMode::Require,
            "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
            "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
            other => {
                return Err(StoreError::Connection(format!("unknown ssl_mode: {other}")));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    if let Some(ref path) = config.ssl_root_cert {
        options = options.ssl_root_cert(path);
    }

    if let Some(ref path) = config.ssl_cert {
        options = options.ssl_client_cert(path);
    }

    if let Some(ref path) = config.ssl_key {
        options = options.ssl_client_key(path);
    }

    Ok(options)
}

type DocumentRow = (
    String,
    Option<String>,
    String,
    String,
    String,
    DateTime<Utc>,
    String,
    Option<serde_json::Value>,
);

type NotificationRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    bool,
);

fn document_from_row(row: DocumentRow) -> Result<Document, StoreError> {
    let (id, owner, original_name, storage_key, mime_type, uploaded_at, status, extraction) = row;
    let status: DocumentStatus = status.parse().map_err(StoreError::Serialization)?;
    let extraction: Option<Extraction> = extraction
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(Document {
        id: DocumentId::new(id),
        owner: owner.map(OwnerId::new),
        original_name,
        storage_key,
        mime_type,
        uploaded_at,
        status,
        extraction,
    })
}

fn notification_from_row(row: NotificationRow) -> Result<Notification, StoreError> {
    let (id, kind, message, document_id, owner, created_at, is_read) = row;
    let kind: NotificationKind = serde_json::from_value(serde_json::Value::String(kind))
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(Notification {
        id: NotificationId::new(id),
        kind,
        message,
        document_id: document_id.map(DocumentId::new),
        owner: owner.map(OwnerId::new),
        created_at,
        read: is_read,
    })
}

fn kind_as_str(kind: NotificationKind) -> Result<String, StoreError> {
    match serde_json::to_value(kind) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(StoreError::Serialization(format!(
            "unexpected kind encoding: {other}"
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

const DOCUMENT_COLUMNS: &str =
    "id, owner, original_name, storage_key, mime_type, uploaded_at, status, extraction";

const NOTIFICATION_COLUMNS: &str =
    "id, kind, message, document_id, owner, created_at, is_read";

/// PostgreSQL-backed implementation of [`DocumentStore`] and
/// [`NotificationStore`].
///
/// Uses `sqlx::PgPool` for connection pooling. The pending-to-terminal
/// transition is enforced with a conditional `UPDATE ... WHERE status =
/// 'pending'`, so concurrent completions resolve to exactly one winner.
pub struct PostgresStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresStore {
    /// Create a new `PostgresStore` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if pool creation fails, or
    /// [`StoreError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        let connect_options = build_connect_options(&config)?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// Create a `PostgresStore` from an existing pool and config.
    ///
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn create(&self, document: &Document) -> Result<(), StoreError> {
        let table = self.config.documents_table();
        let extraction = document
            .extraction
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let query = format!(
            "INSERT INTO {table} ({DOCUMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );

        sqlx::query(&query)
            .bind(document.id.as_str())
            .bind(document.owner.as_ref().map(OwnerId::as_str))
            .bind(&document.original_name)
            .bind(&document.storage_key)
            .bind(&document.mime_type)
            .bind(document.uploaded_at)
            .bind(document.status.as_str())
            .bind(extraction)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let table = self.config.documents_table();
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM {table} WHERE id = $1");

        let row: Option<DocumentRow> = sqlx::query_as(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(document_from_row).transpose()
    }

    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Document>, StoreError> {
        let table = self.config.documents_table();

        let rows: Vec<DocumentRow> = if let Some(owner) = owner {
            let query = format!(
                "SELECT {DOCUMENT_COLUMNS} FROM {table} \
                 WHERE owner = $1 ORDER BY uploaded_at DESC, id"
            );
            sqlx::query_as(&query)
                .bind(owner.as_str())
                .fetch_all(&self.pool)
                .await
        } else {
            let query =
                format!("SELECT {DOCUMENT_COLUMNS} FROM {table} ORDER BY uploaded_at DESC, id");
            sqlx::query_as(&query).fetch_all(&self.pool).await
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(document_from_row).collect()
    }

    async fn complete(
        &self,
        id: &DocumentId,
        status: DocumentStatus,
        extraction: Option<Extraction>,
    ) -> Result<Document, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::Backend(format!(
                "complete called with non-terminal status {status}"
            )));
        }
        let table = self.config.documents_table();
        let extraction = extraction
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Conditional update: only a pending row can be claimed.
        let query = format!(
            "UPDATE {table} SET status = $2, extraction = $3 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {DOCUMENT_COLUMNS}"
        );

        let row: Option<DocumentRow> = sqlx::query_as(&query)
            .bind(id.as_str())
            .bind(status.as_str())
            .bind(extraction)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if let Some(row) = row {
            return document_from_row(row);
        }

        // No pending row claimed: distinguish a missing document from one
        // that already reached a terminal status.
        let select = format!("SELECT status FROM {table} WHERE id = $1");
        let current: Option<(String,)> = sqlx::query_as(&select)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match current {
            Some((current,)) => Err(StoreError::AlreadyTerminal {
                id: id.to_string(),
                current,
            }),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl NotificationStore for PostgresStore {
    async fn create(&self, notification: &Notification) -> Result<(), StoreError> {
        let table = self.config.notifications_table();
        let kind = kind_as_str(notification.kind)?;

        let query = format!(
            "INSERT INTO {table} ({NOTIFICATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        );

        sqlx::query(&query)
            .bind(notification.id.as_str())
            .bind(&kind)
            .bind(&notification.message)
            .bind(notification.document_id.as_ref().map(DocumentId::as_str))
            .bind(notification.owner.as_ref().map(OwnerId::as_str))
            .bind(notification.created_at)
            .bind(notification.read)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Notification>, StoreError> {
        let table = self.config.notifications_table();

        let rows: Vec<NotificationRow> = if let Some(owner) = owner {
            // Unaddressed notifications are visible to everyone.
            let query = format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM {table} \
                 WHERE owner IS NULL OR owner = $1 ORDER BY created_at DESC, id"
            );
            sqlx::query_as(&query)
                .bind(owner.as_str())
                .fetch_all(&self.pool)
                .await
        } else {
            let query =
                format!("SELECT {NOTIFICATION_COLUMNS} FROM {table} ORDER BY created_at DESC, id");
            sqlx::query_as(&query).fetch_all(&self.pool).await
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(notification_from_row).collect()
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<Notification, StoreError> {
        let table = self.config.notifications_table();

        let query = format!(
            "UPDATE {table} SET is_read = TRUE WHERE id = $1 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );

        let row: Option<NotificationRow> = sqlx::query_as(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            Some(row) => notification_from_row(row),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}
