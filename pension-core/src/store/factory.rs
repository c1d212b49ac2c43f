use async_trait::async_trait;
use tracing::{debug, info};

use super::repository::{CalculationStore, StoreError};

/// Backend used when neither the command line nor the config file names one.
pub const DEFAULT_BACKEND: &str = "sqlite";

/// Database file used when no connection string is given.
pub const DEFAULT_DATABASE: &str = "pension.db";

/// Connection string for a store that lives only as long as the process.
pub const IN_MEMORY: &str = ":memory:";

/// Which backend to open and where. Build it from [`Default`] (the
/// `pension.db` file) and layer overrides on top with
/// [`StoreConfig::with_overrides`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            connection_string: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl StoreConfig {
    /// SQLite without a file. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            connection_string: IN_MEMORY.to_string(),
        }
    }

    /// Replaces the fields that are set. Apply the weakest source first so
    /// later calls win. Backend names are matched case-insensitively.
    pub fn with_overrides(
        mut self,
        backend: Option<&str>,
        connection_string: Option<&str>,
    ) -> Self {
        if let Some(backend) = backend {
            self.backend = backend.trim().to_ascii_lowercase();
        }
        if let Some(connection_string) = connection_string {
            self.connection_string = connection_string.trim().to_string();
        }
        self
    }

    /// True when the data is discarded once the store is dropped, either
    /// because of the backend or the connection string.
    pub fn is_in_memory(&self) -> bool {
        self.backend == "memory" || self.connection_string == IN_MEMORY
    }
}

/// Opens one kind of [`CalculationStore`].
#[async_trait]
pub trait StoreFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Opens the store, creating its schema when needed.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn CalculationStore>, StoreError>;
}

/// The backends a binary ships, in the order they were registered.
#[derive(Default)]
pub struct StoreRegistry {
    factories: Vec<Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A factory with the same name takes the place of the
    /// earlier one.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        let name = factory.backend_name();
        match self.factories.iter_mut().find(|f| f.backend_name() == name) {
            Some(slot) => *slot = factory,
            None => self.factories.push(factory),
        }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.backend_name()).collect()
    }

    /// Opens the store `config` describes.
    ///
    /// # Errors
    /// * [`StoreError::Configuration`] when no registered backend has that
    ///   name. The message lists the names that would work.
    /// * Whatever the backend reports while opening.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn CalculationStore>, StoreError> {
        let Some(factory) = self
            .factories
            .iter()
            .find(|f| f.backend_name() == config.backend)
        else {
            return Err(StoreError::Configuration(format!(
                "no store backend named '{}' (choose one of: {})",
                config.backend,
                self.backend_names().join(", ")
            )));
        };

        debug!(
            backend = %config.backend,
            connection = %config.connection_string,
            "opening store"
        );
        if config.is_in_memory() {
            info!("store is in memory; the calculation is lost on exit");
        }
        factory.create(config).await
    }
}
