//! The banner markup: the fragment itself and the loader for client-side integration

use crate::banner::selector::RenderDecision;
use askama::Template;

/// URLs of the banner's static resources, to be referenced by the fragment
#[derive(Debug, Clone, Default)]
pub struct FragmentAssets {
    pub stylesheet_url: Option<String>,
    pub script_url: Option<String>,
}

#[derive(Template)]
#[template(path = "banner.html")]
struct BannerTemplate<'a> {
    content: &'a str,
    style: &'a str,
    close_button: bool,
    assets: &'a FragmentAssets,
}

/// Render the banner markup for the decision, without references to static resources.
///
/// Returns an empty string if the banner is not to be shown.
pub fn render_fragment(decision: &RenderDecision) -> Result<String, askama::Error> {
    render_fragment_with_assets(decision, &FragmentAssets::default())
}

pub fn render_fragment_with_assets(
    decision: &RenderDecision,
    assets: &FragmentAssets,
) -> Result<String, askama::Error> {
    if !decision.show {
        return Ok(String::new());
    }
    BannerTemplate {
        content: &decision.content,
        style: decision.style.as_str(),
        close_button: decision.close_button,
        assets,
    }
    .render()
}

#[derive(Template)]
#[template(path = "banner_loader.html")]
struct LoaderTemplate<'a> {
    content_url: &'a str,
}

/// Render a script that fetches the banner fragment from `content_url` after the page has loaded
/// and prepends it to the page body, unless a banner is present already.
pub fn render_async_loader(content_url: &str) -> Result<String, askama::Error> {
    LoaderTemplate { content_url }.render()
}
