use anyhow::Result;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use tango_note_migration::{Migrator, MigratorTrait};
use tracing::debug;

use crate::config::CONFIG_DIR;

fn database_path() -> std::path::PathBuf {
    // 确保数据目录存在
    if !CONFIG_DIR.exists() {
        std::fs::create_dir_all(&*CONFIG_DIR).expect("创建数据目录失败");
    }
    CONFIG_DIR.join("words.sqlite")
}

/// 创建 SQLite 连接选项
fn create_sqlite_options() -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(database_path())
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
}

async fn database_connection() -> Result<DatabaseConnection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(create_sqlite_options())
        .await?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

async fn migrate_database() -> Result<()> {
    let db_path = CONFIG_DIR.join("words.sqlite");
    if !db_path.exists() {
        debug!("数据库文件不存在，将创建新的数据库");
    }

    // 为迁移创建单连接池，避免多连接导致的迁移顺序问题
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(create_sqlite_options())
        .await?;

    let connection = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
    Migrator::up(&connection, None).await?;

    // 显式关闭连接池，确保释放数据库锁
    pool.close().await;
    debug!("迁移完成，已关闭迁移连接池");

    Ok(())
}

/// 进行数据库迁移并获取数据库连接，供外部使用
pub async fn setup_database() -> Result<DatabaseConnection> {
    migrate_database().await?;
    database_connection().await
}
