// src/lib.rs
pub mod ai;
pub mod config;
pub mod database;
pub mod email;
pub mod linking;
pub mod store;
pub mod utils;
pub mod web;

pub use config::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use web::start_web_server;
