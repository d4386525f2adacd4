use std::time::Duration;

use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::settings::DatabaseSettings;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const MEMORY_PATH: &str = ":memory:";

pub fn create_pool(settings: &DatabaseSettings) -> Result<DbPool> {
    let manager = build_manager(&settings.path, settings.busy_timeout_ms);
    // every in-memory connection is its own database
    let size = if settings.path == MEMORY_PATH {
        1
    } else {
        settings.pool_size
    };
    build_pool(manager, size, settings.path == MEMORY_PATH)
}

pub fn create_memory_pool() -> Result<DbPool> {
    let settings = DatabaseSettings {
        path: MEMORY_PATH.to_string(),
        ..DatabaseSettings::default()
    };
    create_pool(&settings)
}

fn build_manager(path: &str, busy_timeout_ms: u64) -> SqliteConnectionManager {
    let manager = if path == MEMORY_PATH {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(path)
    };
    let busy_timeout = Duration::from_millis(busy_timeout_ms);
    manager.with_init(move |conn| conn.busy_timeout(busy_timeout))
}

fn build_pool(manager: SqliteConnectionManager, size: u32, in_memory: bool) -> Result<DbPool> {
    let mut builder = r2d2::Pool::builder().max_size(size);
    if in_memory {
        // the database dies with its connection, so it must never be reaped
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    builder
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pool_keeps_its_only_connection() {
        let pool = create_memory_pool().unwrap();

        assert_eq!(pool.max_size(), 1);
        assert_eq!(pool.idle_timeout(), None);
        assert_eq!(pool.max_lifetime(), None);
    }

    #[test]
    fn test_memory_pool_sees_its_own_writes() {
        let pool = create_memory_pool().unwrap();
        {
            let conn = get_connection(&pool).unwrap();
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
                .unwrap();
        }

        let conn = get_connection(&pool).unwrap();
        let x: i64 = conn.query_row("SELECT x FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn test_file_pool_uses_configured_size() {
        let file = format!("club_ladder_pool_{}.db", std::process::id());
        let path = std::env::temp_dir().join(file);
        let settings = DatabaseSettings {
            path: path.to_string_lossy().into_owned(),
            pool_size: 3,
            ..DatabaseSettings::default()
        };

        let pool = create_pool(&settings).unwrap();

        assert_eq!(pool.max_size(), 3);
        assert!(pool.idle_timeout().is_some());
        drop(pool);
        let _ = std::fs::remove_file(&path);
    }
}
