use crate::web::ui::base_template::BaseTemplateContext;
use crate::web::ui::error::AppError;
use crate::web::AppState;
use actix_web::body::EitherBody;
use actix_web::web::Html;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use askama::Template;

pub async fn error_page_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<EitherBody<B, String>>, actix_web::Error> {
    let response = next.call(req).await?;

    let (req, res) = response.into_parts();
    let error_page = match res.error() {
        Some(error) => match error.as_error::<AppError>() {
            Some(app_error) => generate_error_page(app_error, &req),
            None => generate_error_page(error.as_response_error(), &req),
        },
        None => {
            return Ok(actix_web::dev::ServiceResponse::new(req, res)
                .map_body(|_, body| EitherBody::left(body)))
        }
    };
    Ok(actix_web::dev::ServiceResponse::new(
        req,
        error_page.map_body(|_, body| EitherBody::right(body)),
    ))
}

fn generate_error_page(
    error: &dyn ResponseError,
    http_request: &HttpRequest,
) -> HttpResponse<String> {
    let locale = http_request
        .app_data::<web::Data<AppState>>()
        .map(|state| state.locale.clone())
        .unwrap_or_else(|| "en".to_owned());
    let tmpl = ErrorTemplate {
        base: BaseTemplateContext {
            request: http_request,
            page_title: "Error",
            locale: &locale,
        },
        error,
    };
    match tmpl.render() {
        Ok(body) => (Html::new(body), error.status_code()).respond_to(http_request),
        Err(err) => (
            format!(
                "Error: {}\n(Could not render nice error page: {})",
                error, err
            ),
            error.status_code(),
        )
            .respond_to(http_request),
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    base: BaseTemplateContext<'a>,
    error: &'a dyn ResponseError,
}
