// src/infrastructure/mod.rs
pub mod config;
pub mod docbase;
pub mod file_writer;
pub mod markdown;

pub use config::{Config, ConfigStore, Settings, TomlConfigStore};
pub use docbase::DocBaseClient;
