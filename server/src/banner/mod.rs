//! The banner core: configuration, render eligibility and markup
//!
//! * [configuration] maps the untyped settings store to the typed [configuration::Configuration]
//!   and implements validation and saving.
//! * [selector] decides for a request whether the banner is shown and with which content
//!   ([selector::ContentSelector::resolve]).
//! * [fragment] renders the decision into HTML.
//! * [templates] and [content_override] are the pluggable content sources used by the selector.

use crate::cli_error::CliError;
use crate::settings_store::StoreError;
use crate::setup;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod configuration;
pub mod content_override;
pub mod fragment;
pub mod selector;
pub mod templates;

/// Create the [selector::ContentSelector] according to the environment variables
/// `BANNER_TEMPLATE_DIR`, `BANNER_OVERRIDE_FILE`, `BANNER_SEPARATE_GUEST_CONTENT` and
/// `BANNER_RECHECK_AFTER_OVERRIDE`.
pub fn get_selector_from_env() -> Result<selector::ContentSelector, CliError> {
    let registry = match setup::get_template_dir_from_env()? {
        Some(directory) => templates::TemplateRegistry::load_from_directory(&directory)
            .map_err(|e| {
                CliError::FileError(format!(
                    "Could not read banner templates from {}: {}",
                    directory.display(),
                    e
                ))
            })?,
        None => templates::TemplateRegistry::new(),
    };
    let options = selector::SelectorOptions {
        separate_guest_content: setup::get_separate_guest_content_from_env()?,
        recheck_after_override: setup::get_recheck_after_override_from_env()?,
    };
    let selector = selector::ContentSelector::new(registry, options);
    Ok(match setup::get_override_file_from_env()? {
        Some(path) => selector.with_content_override(Arc::new(
            content_override::FileContentOverride::new(path),
        )),
        None => selector,
    })
}

/// Failure while producing the banner markup for a page
#[derive(Debug)]
pub enum BannerError {
    Store(StoreError),
    Template(askama::Error),
}

impl From<StoreError> for BannerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<askama::Error> for BannerError {
    fn from(value: askama::Error) -> Self {
        Self::Template(value)
    }
}

impl Display for BannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BannerError::Store(e) => write!(f, "Could not load banner configuration: {}", e),
            BannerError::Template(e) => write!(f, "Could not render banner: {}", e),
        }
    }
}

impl std::error::Error for BannerError {}
