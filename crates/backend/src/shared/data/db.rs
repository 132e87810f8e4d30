use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

async fn table_exists(conn: &DatabaseConnection, name: &str) -> anyhow::Result<bool> {
    let check = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT name FROM sqlite_master WHERE type='table' AND name = ?;",
        vec![name.into()],
    );
    Ok(conn.query_one(check).await?.is_some())
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    // Minimal schema bootstrap
    if !table_exists(&conn, "a001_product").await? {
        tracing::info!("Creating a001_product table");
        let create_product_table_sql = r#"
            CREATE TABLE a001_product (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                reference TEXT NOT NULL DEFAULT '',
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_product_table_sql.to_string(),
        ))
        .await?;
    }

    if !table_exists(&conn, "a002_product_image").await? {
        tracing::info!("Creating a002_product_image table");
        let create_product_image_table_sql = r#"
            CREATE TABLE a002_product_image (
                id TEXT PRIMARY KEY NOT NULL,
                product_ref TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 1,
                cover INTEGER NOT NULL DEFAULT 0,
                legends_json TEXT NOT NULL DEFAULT '{}',
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_product_image_table_sql.to_string(),
        ))
        .await?;
    }

    if !table_exists(&conn, "a003_language").await? {
        tracing::info!("Creating a003_language table");
        let create_language_table_sql = r#"
            CREATE TABLE a003_language (
                iso_code TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_language_table_sql.to_string(),
        ))
        .await?;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "INSERT INTO a003_language (iso_code, name, active) VALUES ('en', 'English', 1);"
                .to_string(),
        ))
        .await?;
    }

    if !table_exists(&conn, "a004_image_type").await? {
        tracing::info!("Creating a004_image_type table");
        let create_image_type_table_sql = r#"
            CREATE TABLE a004_image_type (
                name TEXT PRIMARY KEY NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_image_type_table_sql.to_string(),
        ))
        .await?;
        // Стандартный набор вариантов обложки
        let seed_image_types_sql = r#"
            INSERT INTO a004_image_type (name, width, height) VALUES
                ('cart', 80, 80),
                ('small', 98, 98),
                ('home', 250, 250),
                ('medium', 452, 452),
                ('large', 800, 800);
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            seed_image_types_sql.to_string(),
        ))
        .await?;
    }

    if !table_exists(&conn, "user_form_settings").await? {
        tracing::info!("Creating user_form_settings table");
        let create_form_settings_table_sql = r#"
            CREATE TABLE user_form_settings (
                form_key TEXT PRIMARY KEY NOT NULL,
                settings_json TEXT NOT NULL,
                updated_at TEXT
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_form_settings_table_sql.to_string(),
        ))
        .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
