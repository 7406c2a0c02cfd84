pub mod banner;
pub mod cli;
pub mod cli_error;
pub mod i18n;
pub mod settings_store;
mod setup;
pub mod web;
