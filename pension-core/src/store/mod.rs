//! Keeps the most recent calculation between runs.

pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{
    DEFAULT_BACKEND, DEFAULT_DATABASE, IN_MEMORY, StoreConfig, StoreFactory, StoreRegistry,
};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use repository::{
    CalculationStore, LastCalculation, RESULTS_KEY, StoreError, USER_INPUT_KEY, decode_entry,
    encode_entry,
};
