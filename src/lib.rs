pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod storage;
pub mod timer;
pub mod tui;
