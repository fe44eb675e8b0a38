pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod server;
pub mod utils;

pub use client::{ProxyClient, SearchForm};
pub use config::{credentials::CredentialStore, storage::LocalStorage, ProxyConfig};
pub use core::service::TruckStopService;
pub use server::{create_router, AppState};
pub use utils::error::{ProxyError, Result};
