use crate::banner::configuration::Configuration;
use crate::banner::fragment::{render_fragment_with_assets, FragmentAssets};
use crate::web::ui::base_template::static_resource_url;
use crate::web::ui::error::AppError;
use crate::web::view_hook::viewer_from_request;
use crate::web::AppState;
use actix_web::http::header::{CacheControl, CacheDirective, ContentType};
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};

/// The banner fragment for the requesting viewer, or an empty body if no banner is to be shown.
///
/// Used by the loader script of the async integration mode and by hosts that fetch the banner
/// themselves.
#[get("/content")]
pub async fn banner_content(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let viewer = viewer_from_request(&req);
    let store = state.store.clone();
    let configuration = web::block(move || -> Result<_, AppError> {
        let mut store = store.get_facade()?;
        Ok(Configuration::load(store.as_mut())?)
    })
    .await??;

    let decision = state.selector.resolve(&configuration, viewer);
    let assets = FragmentAssets {
        stylesheet_url: Some(static_resource_url(&req, "banner.css")?),
        script_url: Some(static_resource_url(&req, "banner.js")?),
    };
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .body(render_fragment_with_assets(&decision, &assets)?))
}
