pub mod actions;
pub mod config;
pub mod engine;
pub mod errors;
pub mod goto;
pub mod selection;
pub mod types;
pub mod workspace;
