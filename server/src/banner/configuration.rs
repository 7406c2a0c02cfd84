//! The typed banner configuration and its mapping to the untyped settings store
//!
//! Settings are stored as loosely-typed string scalars in the module namespace [MODULE_ID]. Loading
//! ([Configuration::load]) never fails because of the stored values: missing or malformed values
//! silently fall back to the defaults. Saving ([Configuration::save]) always validates the complete
//! candidate first ([validate]) and does not write anything if any field is invalid.

use crate::settings_store::{SettingsStore, SettingsStoreFacade, StoreError};
use std::fmt::{Display, Formatter};

/// Namespace of the banner settings in the settings store
pub const MODULE_ID: &str = "banner";

#[derive(Debug)]
pub struct EnumMemberNotExistingError {
    member_value: String,
    enum_name: &'static str,
}

impl Display for EnumMemberNotExistingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid {}", self.member_value, self.enum_name)
    }
}

impl std::error::Error for EnumMemberNotExistingError {}

/// Visual severity of the banner, used as CSS class suffix (`alert-{style}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Info, Style::Success, Style::Warning, Style::Danger];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Info => "info",
            Style::Success => "success",
            Style::Warning => "warning",
            Style::Danger => "danger",
        }
    }

    /// English display name, used as translation key
    pub fn label(&self) -> &'static str {
        match self {
            Style::Info => "Info",
            Style::Success => "Success",
            Style::Warning => "Warning",
            Style::Danger => "Danger",
        }
    }
}

impl TryFrom<&str> for Style {
    type Error = EnumMemberNotExistingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Style::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| EnumMemberNotExistingError {
                member_value: value.to_owned(),
                enum_name: "Style",
            })
    }
}

/// Source of the banner content
///
/// [BannerType::Manual] uses the content authored in the configuration. All other types resolve
/// to a built-in template (see [crate::banner::templates::TemplateRegistry]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BannerType {
    #[default]
    Manual,
    WeatherAlert,
    SafetyNotice,
    HarborUpdate,
    EventAnnouncement,
    MaintenanceWindow,
}

impl BannerType {
    pub const ALL: [BannerType; 6] = [
        BannerType::Manual,
        BannerType::WeatherAlert,
        BannerType::SafetyNotice,
        BannerType::HarborUpdate,
        BannerType::EventAnnouncement,
        BannerType::MaintenanceWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerType::Manual => "manual",
            BannerType::WeatherAlert => "weather_alert",
            BannerType::SafetyNotice => "safety_notice",
            BannerType::HarborUpdate => "harbor_update",
            BannerType::EventAnnouncement => "event_announcement",
            BannerType::MaintenanceWindow => "maintenance_window",
        }
    }

    /// English display name, used as translation key
    pub fn label(&self) -> &'static str {
        match self {
            BannerType::Manual => "Manual",
            BannerType::WeatherAlert => "Weather alert",
            BannerType::SafetyNotice => "Safety notice",
            BannerType::HarborUpdate => "Harbor update",
            BannerType::EventAnnouncement => "Event announcement",
            BannerType::MaintenanceWindow => "Maintenance window",
        }
    }
}

impl TryFrom<&str> for BannerType {
    type Error = EnumMemberNotExistingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        BannerType::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| EnumMemberNotExistingError {
                member_value: value.to_owned(),
                enum_name: "BannerType",
            })
    }
}

/// The fields of the banner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Enabled,
    Content,
    ContentGuests,
    CloseButton,
    Style,
    BannerType,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Enabled,
        Field::Content,
        Field::ContentGuests,
        Field::CloseButton,
        Field::Style,
        Field::BannerType,
    ];

    /// Name of the setting in the settings store. Also used as form field name and JSON key.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Enabled => "enabled",
            Field::Content => "content",
            Field::ContentGuests => "contentGuests",
            Field::CloseButton => "closeButton",
            Field::Style => "style",
            Field::BannerType => "bannerType",
        }
    }

    /// English form label, used as translation key
    pub fn label(&self) -> &'static str {
        match self {
            Field::Enabled => "Enabled",
            Field::Content => "Banner content for logged-in users (HTML)",
            Field::ContentGuests => "Banner content for visitors / logged-out users (HTML)",
            Field::CloseButton => "Close button",
            Field::Style => "Style",
            Field::BannerType => "Banner Type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    /// Master switch
    pub enabled: bool,
    /// HTML content for authenticated users
    pub content: String,
    /// HTML content for guests
    pub content_guests: String,
    pub close_button: bool,
    pub style: Style,
    pub banner_type: BannerType,
}

/// Truthy-cast of a stored scalar: only the empty string and "0" are false.
fn truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0")
}

fn bool_to_setting(value: bool) -> String {
    let value = if value { "1" } else { "0" };
    value.to_owned()
}

impl Configuration {
    /// Read the configuration from the settings store, applying the default for every missing or
    /// malformed value.
    ///
    /// Only failures of the store itself are returned as errors.
    pub fn load(store: &mut dyn SettingsStoreFacade) -> Result<Self, StoreError> {
        let defaults = Configuration::default();
        let mut get = |field: Field| store.get_setting(MODULE_ID, field.key());

        Ok(Self {
            enabled: get(Field::Enabled)?
                .map(|v| truthy(&v))
                .unwrap_or(defaults.enabled),
            content: get(Field::Content)?.unwrap_or(defaults.content),
            content_guests: get(Field::ContentGuests)?.unwrap_or(defaults.content_guests),
            close_button: get(Field::CloseButton)?
                .map(|v| truthy(&v))
                .unwrap_or(defaults.close_button),
            style: get(Field::Style)?
                .and_then(|v| Style::try_from(v.as_str()).ok())
                .unwrap_or(defaults.style),
            banner_type: get(Field::BannerType)?
                .and_then(|v| BannerType::try_from(v.as_str()).ok())
                .unwrap_or(defaults.banner_type),
        })
    }

    /// Validate the candidate and persist all of its fields.
    ///
    /// Content fields missing in the candidate keep their stored value. Content values are
    /// trimmed before they are stored. On validation failure, nothing is written. On success, the
    /// configuration as it has been stored is returned.
    pub fn save(
        store: &mut dyn SettingsStoreFacade,
        candidate: &ConfigurationCandidate,
    ) -> Result<Self, SaveError> {
        let mut configuration = validate(candidate)?;
        if candidate.content.is_none() || candidate.content_guests.is_none() {
            let stored = Configuration::load(store)?;
            if candidate.content.is_none() {
                configuration.content = stored.content;
            }
            if candidate.content_guests.is_none() {
                configuration.content_guests = stored.content_guests;
            }
        }
        configuration.content = configuration.content.trim().to_owned();
        configuration.content_guests = configuration.content_guests.trim().to_owned();

        store.set_settings(MODULE_ID, &configuration.to_settings())?;
        Ok(configuration)
    }

    /// Raw setting values of all fields, in store representation
    pub fn to_settings(&self) -> Vec<(&'static str, String)> {
        vec![
            (Field::Enabled.key(), bool_to_setting(self.enabled)),
            (Field::CloseButton.key(), bool_to_setting(self.close_button)),
            (Field::Content.key(), self.content.clone()),
            (Field::ContentGuests.key(), self.content_guests.clone()),
            (Field::Style.key(), self.style.as_str().to_owned()),
            (Field::BannerType.key(), self.banner_type.as_str().to_owned()),
        ]
    }

    /// Create a candidate that validates to this configuration. Used for pre-filling forms.
    pub fn to_candidate(&self) -> ConfigurationCandidate {
        ConfigurationCandidate {
            enabled: bool_to_setting(self.enabled),
            content: Some(self.content.clone()),
            content_guests: Some(self.content_guests.clone()),
            close_button: bool_to_setting(self.close_button),
            style: self.style.as_str().to_owned(),
            banner_type: self.banner_type.as_str().to_owned(),
        }
    }
}

/// Unvalidated configuration values, as submitted via the admin form, the JSON API or the CLI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigurationCandidate {
    pub enabled: String,
    pub content: Option<String>,
    pub content_guests: Option<String>,
    pub close_button: String,
    pub style: String,
    pub banner_type: String,
}

impl From<banner_api_types::BannerConfiguration> for ConfigurationCandidate {
    fn from(value: banner_api_types::BannerConfiguration) -> Self {
        Self {
            enabled: bool_to_setting(value.enabled),
            content: value.content,
            content_guests: value.content_guests,
            close_button: bool_to_setting(value.close_button),
            style: value.style,
            banner_type: value.banner_type,
        }
    }
}

impl From<Configuration> for banner_api_types::BannerConfiguration {
    fn from(value: Configuration) -> Self {
        Self {
            enabled: value.enabled,
            content: Some(value.content),
            content_guests: Some(value.content_guests),
            close_button: value.close_button,
            style: value.style.as_str().to_owned(),
            banner_type: value.banner_type.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    /// English error message, used as translation key
    pub message: &'static str,
}

/// The list of validation errors of a [ConfigurationCandidate], at most one per field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn add(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in self.errors.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field.key(), error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub const INVALID_BOOLEAN_MESSAGE: &str = "Must be a boolean value.";
pub const INVALID_STYLE_MESSAGE: &str = "Style must be one of info, success, warning or danger.";
pub const INVALID_BANNER_TYPE_MESSAGE: &str = "Banner Type is invalid.";

/// Parse a boolean-like form or CLI value (1/0, true/false, on/off, yes/no; empty is false)
pub fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "" | "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Check all fields of the candidate and convert it into a typed [Configuration].
///
/// Content values are passed through unchanged (they are only trimmed when saving).
pub fn validate(candidate: &ConfigurationCandidate) -> Result<Configuration, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let enabled = parse_bool_like(&candidate.enabled);
    if enabled.is_none() {
        errors.add(Field::Enabled, INVALID_BOOLEAN_MESSAGE);
    }
    let close_button = parse_bool_like(&candidate.close_button);
    if close_button.is_none() {
        errors.add(Field::CloseButton, INVALID_BOOLEAN_MESSAGE);
    }
    let style = Style::try_from(candidate.style.as_str()).ok();
    if style.is_none() {
        errors.add(Field::Style, INVALID_STYLE_MESSAGE);
    }
    let banner_type = BannerType::try_from(candidate.banner_type.as_str()).ok();
    if banner_type.is_none() {
        errors.add(Field::BannerType, INVALID_BANNER_TYPE_MESSAGE);
    }

    match (enabled, close_button, style, banner_type) {
        (Some(enabled), Some(close_button), Some(style), Some(banner_type)) => Ok(Configuration {
            enabled,
            content: candidate.content.clone().unwrap_or_default(),
            content_guests: candidate.content_guests.clone().unwrap_or_default(),
            close_button,
            style,
            banner_type,
        }),
        _ => Err(errors),
    }
}

#[derive(Debug)]
pub enum SaveError {
    /// The candidate has not been saved, because at least one field is invalid
    Invalid(ValidationErrors),
    Store(StoreError),
}

impl From<ValidationErrors> for SaveError {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

impl From<StoreError> for SaveError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Invalid(e) => write!(f, "Configuration is invalid: {}", e),
            SaveError::Store(e) => write!(f, "Could not save configuration: {}", e),
        }
    }
}

impl std::error::Error for SaveError {}

/// Per-request access to the banner configuration
///
/// A store connection is only acquired when the configuration is requested for the first time.
/// The loaded configuration is reused for the rest of the context's lifetime. A context must not
/// outlive the request it has been created for.
pub struct ResolutionContext<'a> {
    store: &'a dyn SettingsStore,
    configuration: Option<Configuration>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self {
            store,
            configuration: None,
        }
    }

    pub fn configuration(&mut self) -> Result<&Configuration, StoreError> {
        if self.configuration.is_none() {
            let mut facade = self.store.get_facade()?;
            self.configuration = Some(Configuration::load(facade.as_mut())?);
        }
        Ok(self.configuration.get_or_insert_with(Configuration::default))
    }

    /// Check whether the store has been consulted in this context
    pub fn is_loaded(&self) -> bool {
        self.configuration.is_some()
    }
}
