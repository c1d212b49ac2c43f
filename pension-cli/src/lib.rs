pub mod app;
pub mod config;
pub mod form;
pub mod format;
pub mod logging;
pub mod session;
pub mod table;
pub mod utils;
