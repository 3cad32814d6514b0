pub mod analysis;
pub mod client;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod schema;
pub mod state;
pub mod tools;
