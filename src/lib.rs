pub mod app;
pub mod cli;
pub mod logging;
pub mod proxmox;
pub mod report;
pub mod settings;
