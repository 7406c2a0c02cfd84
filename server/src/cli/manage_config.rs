use crate::banner::configuration::{Configuration, Field, SaveError, MODULE_ID};
use crate::banner::fragment::render_fragment;
use crate::banner::get_selector_from_env;
use crate::banner::selector::Viewer;
use crate::cli_error::CliError;
use crate::settings_store::{get_store_from_env, SettingsStore, SettingsStoreFacade};

/// Field values to change with [configure]. `None` keeps the currently stored value.
#[derive(Debug, Default)]
pub struct ConfigurationChanges {
    pub enabled: Option<String>,
    pub content: Option<String>,
    pub content_guests: Option<String>,
    pub close_button: Option<String>,
    pub style: Option<String>,
    pub banner_type: Option<String>,
}

pub fn print_configuration() -> Result<(), CliError> {
    let store_pool = get_store_from_env()?;
    let mut store = store_pool.get_facade()?;
    let configuration = Configuration::load(store.as_mut())?;
    let stored_keys: Vec<String> = store
        .get_settings(MODULE_ID)?
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec!["setting", "effective value", "stored"])
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .add_rows(
            Field::ALL
                .into_iter()
                .zip(configuration.to_settings_for_display())
                .map(|(field, value)| {
                    [
                        field.key().to_owned(),
                        value,
                        if stored_keys.iter().any(|k| k == field.key()) {
                            "yes".to_owned()
                        } else {
                            "no (default)".to_owned()
                        },
                    ]
                }),
        );

    println!("Banner configuration:");
    println!("{table}");

    let selector = get_selector_from_env()?;
    for (viewer, name) in [(Viewer::Authenticated, "logged-in users"), (Viewer::Guest, "guests")] {
        let decision = selector.resolve(&configuration, viewer);
        println!(
            "Banner is {} for {}.",
            if decision.show { "shown" } else { "hidden" },
            name
        );
    }
    Ok(())
}

/// Print the banner markup, as it would be inlined into a page for the given viewer
pub fn render_banner(viewer: Viewer) -> Result<(), CliError> {
    let store_pool = get_store_from_env()?;
    let mut store = store_pool.get_facade()?;
    let configuration = Configuration::load(store.as_mut())?;
    let decision = get_selector_from_env()?.resolve(&configuration, viewer);
    print!("{}", render_fragment(&decision)?);
    Ok(())
}

/// Change individual fields of the stored configuration.
///
/// The complete resulting configuration is validated and saved. If any field is invalid, nothing
/// is changed.
pub fn configure(changes: ConfigurationChanges) -> Result<(), CliError> {
    let store_pool = get_store_from_env()?;
    let mut store = store_pool.get_facade()?;
    apply_changes(store.as_mut(), changes)?;
    println!("Banner configuration saved.");
    Ok(())
}

fn apply_changes(
    store: &mut dyn SettingsStoreFacade,
    changes: ConfigurationChanges,
) -> Result<Configuration, SaveError> {
    let mut candidate = Configuration::load(store)?.to_candidate();

    if let Some(enabled) = changes.enabled {
        candidate.enabled = enabled;
    }
    if let Some(close_button) = changes.close_button {
        candidate.close_button = close_button;
    }
    if let Some(style) = changes.style {
        candidate.style = style;
    }
    if let Some(banner_type) = changes.banner_type {
        candidate.banner_type = banner_type;
    }
    if changes.content.is_some() {
        candidate.content = changes.content;
    }
    if changes.content_guests.is_some() {
        candidate.content_guests = changes.content_guests;
    }

    Configuration::save(store, &candidate)
}

impl Configuration {
    /// Human-readable values of all fields, in the order of [Field::ALL]
    fn to_settings_for_display(&self) -> Vec<String> {
        let shorten = |s: &str| {
            if s.chars().count() > 60 {
                format!("{}…", s.chars().take(59).collect::<String>())
            } else {
                s.to_owned()
            }
        };
        vec![
            self.enabled.to_string(),
            shorten(&self.content),
            shorten(&self.content_guests),
            self.close_button.to_string(),
            self.style.as_str().to_owned(),
            self.banner_type.as_str().to_owned(),
        ]
    }
}
