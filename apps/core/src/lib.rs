// ABSA Core
// Aspect-based sentiment analysis for product reviews

pub mod absa;
pub mod batch;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod insights;
pub mod models;
pub mod preflight;
pub mod telemetry;

pub use error::AppError;

#[cfg(test)]
mod tests;
