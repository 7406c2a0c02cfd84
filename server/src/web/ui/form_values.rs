//! This module provides the `FormValue` helper types that encapsulate string values and validation
//! error messages for rendering HTML form input fields and validating the corresponding user input.

use crate::banner::configuration::{parse_bool_like, BannerType, Style};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct FormValue<T: FormValueRepresentation> {
    value: Option<String>,
    #[serde(skip)]
    errors: Vec<String>,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

/// Implemented by types that can be used as an HTML form string value
///
/// Validation of the submitted string is not the business of the form value: the banner
/// configuration is validated as a whole (see [crate::banner::configuration::validate]) and the
/// resulting errors are attached to the form values via [FormValue::add_error].
pub trait FormValueRepresentation: Debug {
    fn into_form_value_string(self) -> String;
}

impl FormValueRepresentation for String {
    fn into_form_value_string(self) -> String {
        self
    }
}

impl FormValueRepresentation for Style {
    fn into_form_value_string(self) -> String {
        self.as_str().to_owned()
    }
}

impl FormValueRepresentation for BannerType {
    fn into_form_value_string(self) -> String {
        self.as_str().to_owned()
    }
}

impl<T: FormValueRepresentation> FormValue<T> {
    /// Manually add a validation error related to this form field.
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error)
    }

    /// Check if validation errors have occurred, related to this form value.
    ///
    /// This should only be used by form input sub-templates for changing the rendering of a form
    /// input (like a text input) representing this form value.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the list of validation errors related to this form value.
    ///
    /// This should only be used by form input sub-templates for rendering the validation errors
    /// near to the input representing this form value.
    pub fn errors(&self) -> &Vec<String> {
        &self.errors
    }

    /// Get the current string representation of the form value to be used as the `value` attribute
    /// when rendering the form input.
    pub fn string_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Get the submitted string value, or `None` if the field was missing in the form data.
    pub fn submitted_value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl<T: FormValueRepresentation> Default for FormValue<T>
where
    T: Default,
{
    fn default() -> Self {
        FormValue {
            value: Some(T::default().into_form_value_string()),
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

impl<T: FormValueRepresentation> From<T> for FormValue<T> {
    fn from(value: T) -> Self {
        FormValue {
            value: Some(value.into_form_value_string()),
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

/// Form value of a checkbox
///
/// Browsers only submit checked checkboxes, so a missing field means "unchecked". The submitted
/// string is kept as is and checked by [crate::banner::configuration::validate], like any other
/// boolean-like value.
#[derive(Debug, Default)]
pub struct BoolFormValue {
    value: Option<String>,
    errors: Vec<String>,
}

impl BoolFormValue {
    /// Check if the checkbox is to be rendered as checked. Invalid values render unchecked.
    pub fn is_checked(&self) -> bool {
        self.value
            .as_deref()
            .and_then(parse_bool_like)
            .unwrap_or(false)
    }

    /// Get the submitted string value, or an empty string (false) if the field was missing.
    pub fn submitted_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error)
    }

    /// Check if validation errors have occurred, related to this form value.
    ///
    /// This should only be used by form input sub-templates for changing the rendering of a form
    /// input (like a checkbox) representing this form value.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the list of validation errors related to this form value.
    pub fn errors(&self) -> &Vec<String> {
        &self.errors
    }
}

/// Custom serde Deserialize implementation for BoolFormValue:
/// We want to treat the value like an Option<String>, which is `None` if the field is not present
/// at all, instead of failing on the missing field.
///
/// We achive this by the custom simple Visitor implementation [BoolFormValueVisitor] that only
/// reacts to `visit_some()` and `visit_none()`
impl<'de> serde::Deserialize<'de> for BoolFormValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(BoolFormValueVisitor {})
    }
}

struct BoolFormValueVisitor;

impl<'de> serde::de::Visitor<'de> for BoolFormValueVisitor {
    type Value = BoolFormValue;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a boolean-like string or no such field at all")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(BoolFormValue::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(BoolFormValue {
            value: Some(String::deserialize(deserializer)?),
            errors: vec![],
        })
    }
}

impl From<bool> for BoolFormValue {
    fn from(value: bool) -> Self {
        Self {
            value: value.then(|| "1".to_owned()),
            errors: vec![],
        }
    }
}
