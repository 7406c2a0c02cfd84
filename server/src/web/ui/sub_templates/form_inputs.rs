use crate::web::ui::form_values::{BoolFormValue, FormValue, FormValueRepresentation};
use askama::Template;
use std::borrow::Cow;

/// Multi-line text input, used for the HTML content fields
#[derive(Template)]
#[template(path = "sub_templates/form_inputs/textarea.html")]
pub struct TextareaTemplate<'a, T: FormValueRepresentation> {
    name: &'a str,
    label: &'a str,
    rows: usize,
    info: Option<&'a str>,
    data: &'a FormValue<T>,
}

impl<'a, T: FormValueRepresentation> TextareaTemplate<'a, T> {
    pub fn new(
        data: &'a FormValue<T>,
        name: &'a str,
        label: &'a str,
        rows: usize,
        info: Option<&'a str>,
    ) -> Self {
        Self {
            name,
            label,
            rows,
            info,
            data,
        }
    }
}

pub struct SelectEntry<'a> {
    pub value: Cow<'a, str>,
    pub text: Cow<'a, str>,
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/select.html")]
pub struct SelectTemplate<'a, T: FormValueRepresentation> {
    name: &'a str,
    entries: &'a [SelectEntry<'a>],
    label: &'a str,
    info: Option<&'a str>,
    data: &'a FormValue<T>,
}

impl<'a, T: FormValueRepresentation> SelectTemplate<'a, T> {
    pub fn new(
        data: &'a FormValue<T>,
        name: &'a str,
        entries: &'a [SelectEntry<'a>],
        label: &'a str,
        info: Option<&'a str>,
    ) -> Self {
        Self {
            name,
            entries,
            label,
            info,
            data,
        }
    }

    fn is_selected(&self, entry: &SelectEntry) -> bool {
        entry.value == self.data.string_value()
    }
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/checkbox.html")]
pub struct CheckboxTemplate<'a> {
    name: &'a str,
    label: &'a str,
    info: Option<&'a str>,
    data: &'a BoolFormValue,
}

impl<'a> CheckboxTemplate<'a> {
    pub fn new(
        data: &'a BoolFormValue,
        name: &'a str,
        label: &'a str,
        info: Option<&'a str>,
    ) -> Self {
        Self {
            name,
            label,
            info,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::configuration::Style;

    #[test]
    fn test_select_marks_current_value() {
        let data: FormValue<Style> = Style::Warning.into();
        let entries: Vec<SelectEntry> = Style::ALL
            .iter()
            .map(|s| SelectEntry {
                value: Cow::Borrowed(s.as_str()),
                text: Cow::Borrowed(s.label()),
            })
            .collect();
        let html = SelectTemplate::new(&data, "style", &entries, "Style", None)
            .render()
            .unwrap();
        assert!(html.contains(r#"<option value="warning" selected>Warning</option>"#));
        assert!(html.contains(r#"<option value="info">Info</option>"#));
    }

    #[test]
    fn test_field_errors_are_shown() {
        let mut data: FormValue<String> = "<b>x</b>".to_owned().into();
        data.add_error("Must not be <empty>.".to_owned());
        let html = TextareaTemplate::new(&data, "content", "Content", 6, None)
            .render()
            .unwrap();
        assert!(html.contains("is-invalid"));
        assert!(html.contains("Must not be"));
        assert!(!html.contains("<empty>"));
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains(r#"rows="6""#));
    }

    #[test]
    fn test_checkbox() {
        let data: BoolFormValue = true.into();
        let html = CheckboxTemplate::new(&data, "enabled", "Enabled", None)
            .render()
            .unwrap();
        assert!(html.contains(r#"name="enabled""#));
        assert!(html.contains("checked"));

        let data: BoolFormValue = false.into();
        assert_eq!(data.submitted_value(), "");
        let html = CheckboxTemplate::new(&data, "enabled", "Enabled", None)
            .render()
            .unwrap();
        assert!(!html.contains("checked"));
    }
}
