use crate::banner::get_selector_from_env;
use crate::banner::selector::ContentSelector;
use crate::cli::database_migration::check_migration_state;
use crate::cli_error::CliError;
use crate::settings_store::{get_store_from_env, SettingsStore};
use crate::setup::{
    get_integration_mode_from_env, get_listen_address_from_env, get_listen_port_from_env,
    get_locale_from_env,
};
use actix_web::middleware::from_fn;
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use std::str::FromStr;
use std::sync::Arc;

mod api;
mod http_error_logging;
mod ui;
pub mod view_hook;

pub fn serve() -> Result<(), CliError> {
    check_migration_state()?;
    let state = AppState::new()?;
    let listen_address = get_listen_address_from_env()?;
    let listen_port = get_listen_port_from_env()?;
    info!(
        "Serving banner on {}:{} (integration mode: {})",
        listen_address,
        listen_port,
        state.integration_mode.as_str()
    );
    actix_web::rt::System::new()
        .block_on(
            HttpServer::new(move || {
                App::new()
                    .configure(api::configure_app)
                    .configure(ui::configure_app)
                    .app_data(web::Data::new(state.clone()))
                    .wrap(from_fn(http_error_logging::error_logging_middleware))
                    .wrap(middleware::Compress::default())
            })
            .bind((listen_address, listen_port))
            .map_err(CliError::BindError)?
            .run(),
        )
        .map_err(CliError::ServerError)
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SettingsStore>,
    selector: Arc<ContentSelector>,
    integration_mode: IntegrationMode,
    /// Locale of the admin interface
    locale: String,
}

impl AppState {
    pub fn new() -> Result<Self, CliError> {
        Ok(Self {
            store: Arc::new(get_store_from_env()?),
            selector: Arc::new(get_selector_from_env()?),
            integration_mode: get_integration_mode_from_env()?,
            locale: get_locale_from_env()?,
        })
    }
}

/// The way the banner is put into a host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationMode {
    /// The rendered fragment is inserted into the page markup on the server
    #[default]
    Inline,
    /// Only a small loader script is inserted, which fetches the fragment from the content endpoint
    /// after the page has loaded
    Async,
}

impl IntegrationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationMode::Inline => "inline",
            IntegrationMode::Async => "async",
        }
    }
}

impl FromStr for IntegrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(IntegrationMode::Inline),
            "async" => Ok(IntegrationMode::Async),
            _ => Err(format!("Unknown integration mode '{}'", s)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::banner::selector::SelectorOptions;
    use crate::banner::templates::TemplateRegistry;
    use crate::settings_store::store_mock::StoreMock;

    /// Create an [AppState] around the given mock store, with an empty template registry
    pub fn app_state(store: Arc<StoreMock>, integration_mode: IntegrationMode) -> AppState {
        AppState {
            store,
            selector: Arc::new(ContentSelector::new(
                TemplateRegistry::new(),
                SelectorOptions::default(),
            )),
            integration_mode,
            locale: "en".to_owned(),
        }
    }
}
