pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;

pub use app::{IngestReport, Loader};
pub use config::Config;
pub use error::{AppError, Result};
