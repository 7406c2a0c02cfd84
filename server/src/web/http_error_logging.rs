use crate::web::api::APIError;
use crate::web::ui::error::AppError;
use log::{error, warn};

pub async fn error_logging_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<B>, actix_web::Error> {
    let response = next.call(req).await?;

    if let Some(error) = response.response().error() {
        if let Some(app_error) = error.as_error::<AppError>() {
            match app_error {
                AppError::PageNotFound => {
                    warn!(
                        "HTTP {} page not found at <{}>",
                        response.response().status(),
                        response.request().uri()
                    );
                }
                AppError::TransactionConflict => {}
                AppError::DatabaseConnectionError(e) => {
                    error!(
                        "HTTP {} database connection error: {}",
                        response.response().status(),
                        e
                    );
                }
                AppError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
            }
        } else if let Some(api_error) = error.as_error::<APIError>() {
            match api_error {
                APIError::InvalidJson(_)
                | APIError::InvalidQuery(_)
                | APIError::TransactionConflict => {}
                APIError::InvalidConfiguration(e) => {
                    warn!(
                        "HTTP {} rejected banner configuration at <{}>. Client: <{}> {}",
                        response.response().status(),
                        response.request().uri(),
                        response
                            .request()
                            .connection_info()
                            .realip_remote_addr()
                            .unwrap_or("unknown"),
                        e
                    );
                }
                APIError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
            }
        } else {
            error!(
                "HTTP {} unexpected error at <{}>: {:?}",
                response.response().status(),
                response.request().uri(),
                error
            );
        }
    }
    Ok(response)
}
