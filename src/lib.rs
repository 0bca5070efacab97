// Library root of the `studymate` crate: curriculum intake, transcript
// normalization, the reconciliation engine and the HTTP surface around them.
pub mod advice;
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod models;
pub mod server;
pub mod transcript;

pub use config::AppConfig;
pub use error::{Error, Result};
/// Run the HTTP server (re-exported for `main`).
pub use server::run_server;
