pub mod access;
pub mod client;
pub mod error;
pub mod models;
pub mod path;
pub mod storage;
pub mod system;
pub mod vm;

pub use client::ProxmoxClient;
pub use error::ProxmoxError;
