pub mod config;
pub mod content;
