use crate::banner::configuration::BannerType;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Lookup table of the built-in banner contents, one per non-manual [BannerType]
///
/// Types without a registered template resolve to no content at all, which makes the banner
/// invisible.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<BannerType, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML content for the given banner type, replacing any previous one.
    ///
    /// Registering content for [BannerType::Manual] has no effect, since manual banners always use
    /// the configured content. Returns whether the template has been registered.
    pub fn register(&mut self, banner_type: BannerType, content: String) -> bool {
        if banner_type == BannerType::Manual {
            return false;
        }
        self.templates.insert(banner_type, content);
        true
    }

    pub fn lookup(&self, banner_type: BannerType) -> Option<&str> {
        self.templates.get(&banner_type).map(|t| t.as_str())
    }

    pub fn registered_types(&self) -> Vec<BannerType> {
        BannerType::ALL
            .into_iter()
            .filter(|t| self.templates.contains_key(t))
            .collect()
    }

    /// Load templates from the files `{directory}/{banner_type}.html`, e.g. `weather_alert.html`.
    ///
    /// Missing files are skipped. Any other I/O error is returned.
    pub fn load_from_directory(directory: &Path) -> Result<Self, std::io::Error> {
        let mut result = Self::new();
        for banner_type in BannerType::ALL {
            if banner_type == BannerType::Manual {
                continue;
            }
            let path = directory.join(format!("{}.html", banner_type.as_str()));
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    info!(
                        "Loaded banner template for {} from {}",
                        banner_type.as_str(),
                        path.display()
                    );
                    result.register(banner_type, content);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(result)
    }
}
