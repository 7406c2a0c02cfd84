//! The HTML part of the web service: the admin configuration page, the public banner content
//! endpoint and the static resources of the banner fragment

use crate::web::ui::error::AppError;
use crate::web::ui::framework::error_page::error_page_middleware;
use crate::web::ui::framework::flash::flash_middleware;
use crate::web::view_hook::banner_injection_middleware;
use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::middleware::from_fn;
use actix_web::{get, web, HttpResponse, Responder};
use rust_embed::Embed;

pub mod base_template;
mod endpoints;
pub mod error;
mod form_values;
pub mod framework;
mod sub_templates;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/banner")
            .service(static_resources)
            .service(endpoints::content::banner_content)
            .service(endpoints::config::config_form)
            .service(endpoints::config::save_config)
            .default_service(web::to(not_found_handler))
            .wrap(from_fn(banner_injection_middleware))
            .wrap(from_fn(flash_middleware))
            .wrap(from_fn(error_page_middleware)),
    );
}

#[derive(Embed)]
#[folder = "static/"]
struct Resources;

impl Resources {
    fn handle_embedded_file(path: &str) -> HttpResponse {
        match Self::get(path) {
            Some(content) => HttpResponse::Ok()
                .content_type(mime_guess::from_path(path).first_or_octet_stream().as_ref())
                .append_header(CacheControl(vec![CacheDirective::MaxAge(86400 * 365)]))
                .body(content.data.into_owned()),
            None => {
                HttpResponse::NotFound().body(format!("Static resource file '{}' not found", path))
            }
        }
    }
}

#[get("/static/{_:.*}")]
async fn static_resources(path: web::Path<String>) -> impl Responder {
    Resources::handle_embedded_file(path.as_str())
}

async fn not_found_handler() -> Result<&'static str, AppError> {
    Err(AppError::PageNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings_store::store_mock::StoreMock;
    use crate::web::test_util::app_state;
    use crate::web::IntegrationMode;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_static_resources() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    Arc::new(StoreMock::default()),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/banner/static/banner.css")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/css"
        );
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("--hh-banner-height"));

        let req = test::TestRequest::get()
            .uri("/banner/static/missing.js")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/banner/unknown")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
