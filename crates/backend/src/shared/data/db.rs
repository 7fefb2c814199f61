use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_PRODUCT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS a001_product (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        category TEXT,
        price REAL,
        image_url TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL
    );
"#;

const CREATE_PRODUCT_STATUS_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_a001_product_status ON a001_product (status);
"#;

const CREATE_MARKETPLACE_CONFIG_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS a002_marketplace_config (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        access_token TEXT NOT NULL DEFAULT '',
        refresh_token TEXT,
        shop_id TEXT,
        expires_at TEXT,
        updated_at TEXT NOT NULL
    );
"#;

/// Открыть SQLite базу и создать недостающие таблицы
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Connecting to database: {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

/// Минимальная схема: таблицы товаров и настроек маркетплейсов
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in [
        CREATE_PRODUCT_TABLE,
        CREATE_PRODUCT_STATUS_INDEX,
        CREATE_MARKETPLACE_CONFIG_TABLE,
    ] {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    tracing::info!("Database schema is ready");
    Ok(())
}

/// Process-wide connection. Panics if `initialize_database` was not called,
/// which only happens on a startup ordering bug.
pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
