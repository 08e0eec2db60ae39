use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use nt_core::{ArticleStorage, Error, Result};
use tracing::info;

pub mod backends;

pub use backends::*;

pub const DEFAULT_DB_PATH: &str = "sqlite.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(Error::Storage(format!(
                "Unknown storage backend: {}. Available backends: memory, sqlite",
                other
            ))),
        }
    }
}

/// Opens the named backend. `db_path` is only used by SQLite and defaults to
/// [`DEFAULT_DB_PATH`].
pub async fn create_storage(kind: &str, db_path: Option<&Path>) -> Result<Arc<dyn ArticleStorage>> {
    match kind.parse::<StorageKind>()? {
        StorageKind::Memory => {
            info!("🏦 Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new().await?))
        }
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let path = db_path.unwrap_or_else(|| Path::new(DEFAULT_DB_PATH));
            let storage = SQLiteStorage::new_with_path(path).await?;
            info!("🏦 Using SQLite storage at {}", storage.get_db_path().display());
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => {
            let _ = db_path;
            Err(Error::Storage(
                "SQLite support is not compiled in (enable the `sqlite` feature)".to_string(),
            ))
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageKind};
}
