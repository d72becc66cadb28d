use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating required tables if they do not exist.
///
/// This creates the documents and notifications tables in the configured
/// schema with the configured table prefix.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let documents_table = config.documents_table();
    let notifications_table = config.notifications_table();

    // Extraction payloads are stored as JSONB so partial provider output
    // survives verbatim without a rigid column per field.
    let create_documents = format!(
        "CREATE TABLE IF NOT EXISTS {documents_table} (
            id TEXT PRIMARY KEY,
            owner TEXT,
            original_name TEXT NOT NULL,
            storage_key TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            uploaded_at TIMESTAMPTZ NOT NULL,
            status TEXT NOT NULL,
            extraction JSONB
        )"
    );

    // Listings are newest-first, optionally scoped to one owner.
    let create_documents_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}documents_owner_uploaded_idx \
         ON {documents_table} (owner, uploaded_at DESC)",
        config.table_prefix
    );

    let create_notifications = format!(
        "CREATE TABLE IF NOT EXISTS {notifications_table} (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            message TEXT NOT NULL,
            document_id TEXT,
            owner TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            is_read BOOLEAN NOT NULL DEFAULT FALSE
        )"
    );

    let create_notifications_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}notifications_created_idx \
         ON {notifications_table} (created_at DESC)",
        config.table_prefix
    );

    sqlx::query(&create_documents).execute(pool).await?;
    sqlx::query(&create_documents_idx).execute(pool).await?;
    sqlx::query(&create_notifications).execute(pool).await?;
    sqlx::query(&create_notifications_idx).execute(pool).await?;

    Ok(())
}
