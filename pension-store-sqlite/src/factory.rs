use async_trait::async_trait;

use pension_core::store::{StoreConfig, StoreFactory};
use pension_core::{CalculationStore, StoreError};

use crate::repository::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`pension_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use pension_core::store::StoreRegistry;
/// use pension_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"pension.db"`. The file is created if it
    ///   does not exist.
    /// * [`pension_core::store::IN_MEMORY`], an ephemeral in-memory database.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn CalculationStore>, StoreError> {
        let store = SqliteStore::open(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{:#}", e)))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Database(format!("{:#}", e)))?;
        Ok(Box::new(store))
    }
}
