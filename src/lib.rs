pub mod commands;
pub mod config;
pub mod dispatch;
pub mod filter;
pub mod format;
pub mod ipc;
pub mod library;
pub mod menu;
pub mod probe;
pub mod properties;
