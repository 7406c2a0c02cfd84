//! Integration of the banner into the pages of a host application
//!
//! [on_page_render] is the single entry point, to be called once per rendered page.
//! [banner_injection_middleware] calls it for every HTML response of a wrapped actix-web scope or
//! resource and inserts the resulting markup right after the opening `<body>` tag.

use crate::banner::configuration::ResolutionContext;
use crate::banner::fragment::{render_async_loader, render_fragment_with_assets, FragmentAssets};
use crate::banner::selector::{ContentSelector, Viewer};
use crate::banner::BannerError;
use crate::web::ui::base_template::static_resource_url;
use crate::web::ui::error::AppError;
use crate::web::{AppState, IntegrationMode};
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::middleware::Next;
use actix_web::{web, HttpRequest, HttpResponse};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Request header by which the host marks requests of logged-in users
pub const VIEWER_HEADER: &str = "X-Banner-Viewer";

/// Classify the viewer of the request. Everyone not explicitly marked as authenticated by the host
/// is a guest.
pub fn viewer_from_request(request: &HttpRequest) -> Viewer {
    match request
        .headers()
        .get(VIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(v) if v.trim().eq_ignore_ascii_case("authenticated") => Viewer::Authenticated,
        _ => Viewer::Guest,
    }
}

/// What the host knows about the page that is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    /// The page is rendered by a background job or command line invocation
    pub is_console_request: bool,
    /// The request has been issued by a script (XHR/fetch) and does not produce a full page
    pub is_ajax_request: bool,
    pub viewer: Viewer,
}

impl PageContext {
    pub fn from_request(request: &HttpRequest) -> Self {
        Self {
            is_console_request: false,
            is_ajax_request: request
                .headers()
                .get("X-Requested-With")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest")),
            viewer: viewer_from_request(request),
        }
    }

    /// Check if the banner may be put into this page at all
    pub fn qualifies(&self) -> bool {
        !self.is_console_request && !self.is_ajax_request
    }
}

/// Produce the markup to be put into the page, if any.
///
/// For pages that don't qualify (see [PageContext::qualifies]), `None` is returned without
/// touching the settings store. In [IntegrationMode::Async], the store is not consulted either:
/// the returned loader script fetches the banner from `content_url` on the client side.
pub fn on_page_render(
    page: &PageContext,
    context: &mut ResolutionContext,
    selector: &ContentSelector,
    mode: IntegrationMode,
    assets: &FragmentAssets,
    content_url: &str,
) -> Result<Option<String>, BannerError> {
    if !page.qualifies() {
        return Ok(None);
    }
    match mode {
        IntegrationMode::Async => Ok(Some(render_async_loader(content_url)?)),
        IntegrationMode::Inline => {
            let decision = selector.resolve(context.configuration()?, page.viewer);
            if !decision.show {
                return Ok(None);
            }
            Ok(Some(render_fragment_with_assets(&decision, assets)?))
        }
    }
}

/// Find the position right after the opening `<body>` tag of an HTML document.
fn find_body_start(html: &str) -> Option<usize> {
    lazy_static! {
        static ref BODY_TAG: Regex =
            Regex::new(r"(?i)<body\b[^>]*>").expect("body tag pattern should be a valid regex");
    }
    BODY_TAG.find(html).map(|m| m.end())
}

fn is_html_response<B>(response: &HttpResponse<B>) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("text/html"))
}

/// Middleware that puts the banner into every successful HTML page of the wrapped service.
///
/// Requires the [AppState] as app data. Failures of the settings store are turned into an error
/// response for the whole page.
pub async fn banner_injection_middleware<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let page = PageContext::from_request(req.request());
    let response = next.call(req).await?;

    if !page.qualifies()
        || !response.status().is_success()
        || !is_html_response(response.response())
    {
        return Ok(response.map_into_left_body());
    }
    let Some(state) = response.request().app_data::<web::Data<AppState>>().cloned() else {
        debug!("No AppState available. Not injecting banner.");
        return Ok(response.map_into_left_body());
    };

    let (request, response) = response.into_parts();
    let (mut response, body) = response.into_parts();
    let body = match actix_web::body::to_bytes(body).await {
        Ok(body) => body,
        Err(e) => {
            let e: Box<dyn std::error::Error> = e.into();
            let error = AppError::InternalError(format!("Could not read page body: {}", e));
            return Ok(ServiceResponse::from_err(error, request).map_into_right_body());
        }
    };
    response.headers_mut().remove(CONTENT_LENGTH);

    let html = match String::from_utf8(body.to_vec()) {
        Ok(html) => html,
        Err(_) => {
            return Ok(ServiceResponse::new(request, response.set_body(body))
                .map_into_boxed_body()
                .map_into_right_body())
        }
    };
    let Some(body_start) = find_body_start(&html) else {
        return Ok(ServiceResponse::new(request, response.set_body(html))
            .map_into_boxed_body()
            .map_into_right_body());
    };

    let assets = FragmentAssets {
        stylesheet_url: Some(static_resource_url(&request, "banner.css")?),
        script_url: Some(static_resource_url(&request, "banner.js")?),
    };
    let content_url = request.url_for_static("banner_content")?.to_string();
    let store = state.store.clone();
    let selector = state.selector.clone();
    let mode = state.integration_mode;
    let markup = web::block(move || -> Result<_, BannerError> {
        let mut context = ResolutionContext::new(store.as_ref());
        on_page_render(&page, &mut context, &selector, mode, &assets, &content_url)
    })
    .await
    .map_err(AppError::from)
    .and_then(|result| result.map_err(AppError::from));

    let new_body = match markup {
        Ok(Some(markup)) => {
            let mut new_body = String::with_capacity(html.len() + markup.len());
            new_body.push_str(&html[..body_start]);
            new_body.push_str(&markup);
            new_body.push_str(&html[body_start..]);
            new_body
        }
        Ok(None) => html,
        Err(e) => return Ok(ServiceResponse::from_err(e, request).map_into_right_body()),
    };
    Ok(ServiceResponse::new(request, response.set_body(new_body))
        .map_into_boxed_body()
        .map_into_right_body())
}
