#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod data;
pub mod effects;
pub mod launch;
pub mod links;
pub mod ui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
