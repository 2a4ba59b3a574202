pub mod cli;
pub mod collection;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod jobs;
pub mod logger;
pub mod query;
pub mod types;
pub mod utils;
pub mod wal;

use crate::config::AppConfig;
use crate::engine::Engine;
use crate::errors::DbError;
use crate::jobs::JobService;

/// Opens the store at the configured path and the job service over it.
///
/// # Errors
/// Returns an error if the write-ahead log cannot be replayed or opened.
pub fn open(cfg: &AppConfig) -> Result<JobService, DbError> {
    let engine = Engine::open(&cfg.db_path())?;
    JobService::new(&engine, Box::new(cfg.geocoder()), cfg.page_size())
}

/// A job service over a store that lives only as long as the process.
///
/// # Errors
/// Same as [`JobService::new`].
pub fn open_in_memory(cfg: &AppConfig) -> Result<JobService, DbError> {
    JobService::new(&Engine::in_memory(), Box::new(cfg.geocoder()), cfg.page_size())
}
