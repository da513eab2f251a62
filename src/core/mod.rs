// src/core/mod.rs
//! Configuration, file system and network plumbing shared by every client

pub mod config_manager;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
pub use service_client::{ApiGateway, HttpTransport, Transport};
