//! Render eligibility: decides for one request whether the banner is shown, and with which content

use crate::banner::configuration::{BannerType, Configuration, Style};
use crate::banner::content_override::ContentOverride;
use crate::banner::templates::TemplateRegistry;
use std::sync::Arc;

/// Identity class of the viewer of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Guest,
    Authenticated,
}

impl Viewer {
    pub fn is_guest(&self) -> bool {
        *self == Viewer::Guest
    }
}

/// The outcome of [ContentSelector::resolve]. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDecision {
    pub show: bool,
    /// The untrimmed content, to keep intentional whitespace of the authored HTML
    pub content: String,
    pub style: Style,
    pub close_button: bool,
}

impl From<RenderDecision> for banner_api_types::RenderDecision {
    fn from(value: RenderDecision) -> Self {
        Self {
            show: value.show,
            content: value.content,
            style: value.style.as_str().to_owned(),
            close_button: value.close_button,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SelectorOptions {
    /// Show `content_guests` to guests. If false, guests get the same `content` as authenticated
    /// users.
    pub separate_guest_content: bool,
    /// Re-evaluate `show` after the content override hook replaced the content. If false, the
    /// hook can change the content, but not the visibility of the banner.
    pub recheck_after_override: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            separate_guest_content: true,
            recheck_after_override: false,
        }
    }
}

pub struct ContentSelector {
    templates: TemplateRegistry,
    content_override: Option<Arc<dyn ContentOverride>>,
    options: SelectorOptions,
}

impl ContentSelector {
    pub fn new(templates: TemplateRegistry, options: SelectorOptions) -> Self {
        Self {
            templates,
            content_override: None,
            options,
        }
    }

    pub fn with_content_override(mut self, content_override: Arc<dyn ContentOverride>) -> Self {
        self.content_override = Some(content_override);
        self
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn has_active_override(&self) -> bool {
        self.content_override
            .as_ref()
            .is_some_and(|hook| hook.is_active())
    }

    /// Decide whether and how the banner is shown for the given viewer.
    ///
    /// The result only depends on the arguments (and the content override hook, if any).
    pub fn resolve(&self, configuration: &Configuration, viewer: Viewer) -> RenderDecision {
        if !configuration.enabled {
            return RenderDecision {
                show: false,
                content: String::new(),
                style: configuration.style,
                close_button: configuration.close_button,
            };
        }

        let raw = self.raw_content(configuration, viewer);
        let mut show = !raw.trim().is_empty();
        let mut content = raw.to_owned();

        if let Some(hook) = &self.content_override {
            if let Some(overridden) = hook.override_content(&content, viewer) {
                content = overridden;
                if self.options.recheck_after_override {
                    show = !content.trim().is_empty();
                }
            }
        }

        RenderDecision {
            show,
            content,
            style: configuration.style,
            close_button: configuration.close_button,
        }
    }

    fn raw_content<'a>(&'a self, configuration: &'a Configuration, viewer: Viewer) -> &'a str {
        match configuration.banner_type {
            BannerType::Manual => {
                if viewer.is_guest() && self.options.separate_guest_content {
                    &configuration.content_guests
                } else {
                    &configuration.content
                }
            }
            other => self.templates.lookup(other).unwrap_or(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_configuration(content: &str, content_guests: &str) -> Configuration {
        Configuration {
            enabled: true,
            content: content.to_owned(),
            content_guests: content_guests.to_owned(),
            ..Configuration::default()
        }
    }

    fn selector() -> ContentSelector {
        ContentSelector::new(TemplateRegistry::new(), SelectorOptions::default())
    }

    #[test]
    fn test_disabled_is_never_shown() {
        let configuration = Configuration {
            enabled: false,
            content: "<b>Hi</b>".to_owned(),
            content_guests: "Welcome!".to_owned(),
            ..Configuration::default()
        };
        for viewer in [Viewer::Guest, Viewer::Authenticated] {
            assert!(!selector().resolve(&configuration, viewer).show);
        }
    }

    #[test]
    fn test_authenticated_viewer() {
        let configuration = Configuration {
            enabled: true,
            content: "<b>Hi</b>".to_owned(),
            close_button: true,
            style: Style::Warning,
            ..Configuration::default()
        };
        assert_eq!(
            selector().resolve(&configuration, Viewer::Authenticated),
            RenderDecision {
                show: true,
                content: "<b>Hi</b>".to_owned(),
                style: Style::Warning,
                close_button: true,
            }
        );
    }

    #[test]
    fn test_guest_viewer() {
        let configuration = enabled_configuration("", "Welcome!");
        let decision = selector().resolve(&configuration, Viewer::Guest);
        assert!(decision.show);
        assert_eq!(decision.content, "Welcome!");

        let decision = selector().resolve(&configuration, Viewer::Authenticated);
        assert!(!decision.show);

        let configuration = enabled_configuration("<b>Hi</b>", "  \n\t");
        assert!(!selector().resolve(&configuration, Viewer::Guest).show);
    }

    #[test]
    fn test_guest_viewer_without_separate_guest_content() {
        let selector = ContentSelector::new(
            TemplateRegistry::new(),
            SelectorOptions {
                separate_guest_content: false,
                ..SelectorOptions::default()
            },
        );
        let decision =
            selector.resolve(&enabled_configuration("<b>Hi</b>", "Welcome!"), Viewer::Guest);
        assert!(decision.show);
        assert_eq!(decision.content, "<b>Hi</b>");
    }

    #[test]
    fn test_whitespace_content_is_empty_but_kept_untrimmed() {
        assert!(!selector()
            .resolve(&enabled_configuration(" \n ", ""), Viewer::Authenticated)
            .show);

        let decision =

            selector().resolve(&enabled_configuration("  <i>x</i>\n", ""), Viewer::Authenticated);
        assert!(decision.show);
        assert_eq!(decision.content, "  <i>x</i>\n");
    }

    #[test]
    fn test_builtin_type_without_template() {
        let configuration = Configuration {
            banner_type: BannerType::WeatherAlert,
            ..enabled_configuration("<b>Hi</b>", "Welcome!")
        };
        let decision = selector().resolve(&configuration, Viewer::Authenticated);
        assert!(!decision.show);
        assert_eq!(decision.content, "");
    }

    #[test]
    fn test_builtin_type_with_template() {
        let mut templates = TemplateRegistry::new();
        templates.register(BannerType::WeatherAlert, "<p>Storm warning</p>".to_owned());
        let selector = ContentSelector::new(templates, SelectorOptions::default());
        let configuration = Configuration {
            banner_type: BannerType::WeatherAlert,
            ..enabled_configuration("<b>Hi</b>", "")
        };
        for viewer in [Viewer::Guest, Viewer::Authenticated] {
            let decision = selector.resolve(&configuration, viewer);
            assert!(decision.show);
            assert_eq!(decision.content, "<p>Storm warning</p>");
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let configuration = enabled_configuration("<b>Hi</b>", "Welcome!");
        let selector = selector();
        assert_eq!(
            selector.resolve(&configuration, Viewer::Guest),
            selector.resolve(&configuration, Viewer::Guest)
        );
    }

    #[test]
    fn test_override_does_not_change_visibility() {
        let blanking = |_: &str, _: Viewer| Some(String::new());
        let selector =
            ContentSelector::new(TemplateRegistry::new(), SelectorOptions::default())
                .with_content_override(Arc::new(blanking));
        assert!(selector.has_active_override());
        let decision =
            selector.resolve(&enabled_configuration("<b>Hi</b>", ""), Viewer::Authenticated);
        assert!(decision.show);
        assert_eq!(decision.content, "");
    }

    #[test]
    fn test_override_with_recheck() {
        let blanking = |_: &str, _: Viewer| Some(String::new());
        let selector = ContentSelector::new(
            TemplateRegistry::new(),
            SelectorOptions {
                recheck_after_override: true,
                ..SelectorOptions::default()
            },
        )
        .with_content_override(Arc::new(blanking));
        let decision =
            selector.resolve(&enabled_configuration("<b>Hi</b>", ""), Viewer::Authenticated);
        assert!(!decision.show);

        let filling = |content: &str, viewer: Viewer| {
            if viewer.is_guest() {
                Some(format!("{}<p>Guests welcome</p>", content))
            } else {
                None
            }
        };
        let selector = ContentSelector::new(
            TemplateRegistry::new(),
            SelectorOptions {
                recheck_after_override: true,
                ..SelectorOptions::default()
            },
        )
        .with_content_override(Arc::new(filling));
        let decision = selector.resolve(&enabled_configuration("<b>Hi</b>", ""), Viewer::Guest);
        assert!(decision.show);
        assert_eq!(decision.content, "<p>Guests welcome</p>");
        let decision =
            selector.resolve(&enabled_configuration("<b>Hi</b>", ""), Viewer::Authenticated);
        assert_eq!(decision.content, "<b>Hi</b>");
    }
}
