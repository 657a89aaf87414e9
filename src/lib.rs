pub mod api;
pub mod board;
pub mod config;
pub mod db;
pub mod loader;
pub mod logging;
pub mod shutdown;
