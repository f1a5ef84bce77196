//! Daily fortune service: validates a birth date and blood type, asks a
//! generative model for a fortune in a chosen persona, and returns only
//! structurally valid results.

pub mod config;
pub mod errors;
pub mod fortune;
pub mod llm_client;
pub mod routes;
pub mod state;
