use crate::banner::selector::Viewer;
use log::warn;
use std::path::PathBuf;

/// Extension hook that may replace the resolved banner content before it is rendered
///
/// It is invoked by [crate::banner::selector::ContentSelector::resolve] with the default content
/// for the viewer, after the eligibility test. Returning `None` keeps the default content.
pub trait ContentOverride: Send + Sync {
    fn override_content(&self, content: &str, viewer: Viewer) -> Option<String>;

    /// Whether the hook currently overrides anything. Used to warn administrators that their
    /// configuration may not be what is displayed.
    fn is_active(&self) -> bool {
        true
    }
}

impl<F> ContentOverride for F
where
    F: Fn(&str, Viewer) -> Option<String> + Send + Sync,
{
    fn override_content(&self, content: &str, viewer: Viewer) -> Option<String> {
        self(content, viewer)
    }
}

/// Override the banner content with the contents of a file, as long as that file exists and is
/// not blank.
///
/// This allows external processes (e.g. a maintenance script) to take over the banner without
/// touching the stored configuration. The file is read on every invocation.
#[derive(Debug, Clone)]
pub struct FileContentOverride {
    path: PathBuf,
}

impl FileContentOverride {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if !content.trim().is_empty() => Some(content),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "Could not read banner override file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

impl ContentOverride for FileContentOverride {
    fn override_content(&self, _content: &str, _viewer: Viewer) -> Option<String> {
        self.read()
    }

    fn is_active(&self) -> bool {
        self.read().is_some()
    }
}
