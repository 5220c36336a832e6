pub mod api;
pub mod app;
pub mod authz;
pub mod config;
pub mod errors;
pub mod identity;
pub mod mappers;
pub mod models;
pub mod notify;
pub mod services;
pub mod utils;
pub mod validation;
pub mod workflow;

// Re-export commonly used items for tests
pub use app::{create_context, create_pdf_analyzer, create_pea_service, AppContext};
pub use errors::{AppError, AppResult, NormalizedError};
