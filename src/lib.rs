#[macro_use]
extern crate diesel;

use std::fs;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::web::errors::{ServiceError, ServiceResult};

pub mod models;
pub mod readings;
pub mod schema;
pub mod settings;
pub mod web;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Milliseconds a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

#[derive(Debug)]
struct SqliteSetup;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct AppData {
    pub pool: models::Pool,
}

impl AppData {
    pub fn new(database_url: &str, pool_size: u32) -> ServiceResult<Self> {
        // SQLite won't create missing directories on its own
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(SqliteSetup))
            .build(manager)?;

        Ok(AppData { pool })
    }

    pub fn get_connection(&self) -> ServiceResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
        Ok(self.pool.get()?)
    }

    pub fn setup_migrations(&self) -> ServiceResult<()> {
        let mut conn = self.get_connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)
            .map_err(|x| ServiceError::InternalServerError(format!("Migration error: {}", x)))?;
        for version in applied {
            info!("Applied migration {}", version);
        }
        Ok(())
    }

    /// Drops every table and recreates the schema, destroying all readings.
    pub fn reset_database(&self) -> ServiceResult<()> {
        let mut conn = self.get_connection()?;
        conn.revert_all_migrations(MIGRATIONS)
            .map_err(|x| ServiceError::InternalServerError(format!("Migration error: {}", x)))?;
        std::mem::drop(conn);
        self.setup_migrations()
    }
}
