//! # Teamform
//!
//! Library side of the `teamform` binary: configuration loading, error
//! handling and the JSON-file collaborators the engine reads from and
//! writes to.

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, OutputConfig};
pub use error::AppError;
pub use store::{JsonRoster, JsonSink, form_and_persist};
