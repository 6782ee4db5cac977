//! Database module for the Apple Books SQLite stores
//!
//! Read-only access to the library (books) and annotation databases.

mod annotations;
mod library;

pub use annotations::*;
pub use library::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::error::Result;

/// Open a read-only connection pool on one of the reader's databases
pub async fn open_pool(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    tracing::debug!("Opened {}", path.display());
    Ok(pool)
}
