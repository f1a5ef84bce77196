// Daily fortune generation.
// All provider calls go through llm_client::TextGenerator; nothing here talks HTTP to the provider.

pub mod cache;
pub mod cache_key;
pub mod error;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;

pub use error::FortuneError;
pub use models::{BloodType, FortuneRequest, FortuneResult, Mode};
pub use service::{FortuneService, RetryPolicy};
