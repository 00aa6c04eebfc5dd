//! Database connection management and the single-writer actor.

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;

use crate::errors::StorageError;
use ledgerlink_core::errors::{DatabaseError, Error, Result};

mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates an r2d2 connection pool for the given SQLite database path.
pub fn create_pool(database_url: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

/// Checks out a connection from the pool.
pub fn get_connection(pool: &Arc<DbPool>) -> Result<DbConnection> {
    pool.get()
        .map_err(|e| Error::Database(DatabaseError::ConnectionFailed(e.to_string())))
}

/// Runs all pending embedded migrations.
pub fn run_migrations(pool: &Arc<DbPool>) -> Result<()> {
    let mut conn = get_connection(pool)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
    Ok(())
}

/// Creates the pool, applies migrations, and enables foreign keys.
///
/// This is the one-call setup used by the CLI and tests.
pub fn init(database_url: &str) -> Result<Arc<DbPool>> {
    let pool = create_pool(database_url)?;
    {
        use diesel::prelude::*;
        let mut conn = get_connection(&pool)?;
        diesel::sql_query("PRAGMA foreign_keys = ON;")
            .execute(&mut conn)
            .map_err(StorageError::from)?;
    }
    run_migrations(&pool)?;
    Ok(pool)
}
