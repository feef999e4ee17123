pub mod config;
pub mod error;
pub mod export;
pub mod location;
pub mod models;
pub mod report;

pub use error::{AppError, Result};
