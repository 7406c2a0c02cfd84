use std::fmt::Display;

mod endpoints_configuration;

use crate::banner::configuration::{SaveError, ValidationErrors};
use crate::settings_store::StoreError;
use actix_web::error::JsonPayloadError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web, HttpResponse,
};
use serde_json::json;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(get_api_service());
}

fn get_api_service() -> actix_web::Scope {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| APIError::InvalidJson(err).into());
    let query_config =
        web::QueryConfig::default().error_handler(|err, _req| APIError::InvalidQuery(err).into());
    web::scope("/api/v1")
        .app_data(json_config)
        .app_data(query_config)
        .service(endpoints_configuration::get_configuration)
        .service(endpoints_configuration::update_configuration)
        .service(endpoints_configuration::get_decision)
}

#[derive(Debug)]
pub enum APIError {
    InvalidJson(JsonPayloadError),
    InvalidQuery(actix_web::error::QueryPayloadError),
    InvalidConfiguration(ValidationErrors),
    TransactionConflict,
    InternalError(String),
}

impl Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(e) => {
                write!(f, "Invalid JSON request data: {}", e)?;
            }
            Self::InvalidQuery(e) => {
                write!(f, "Invalid query parameters: {}", e)?;
            }
            Self::InvalidConfiguration(e) => {
                write!(f, "Invalid banner configuration: {}", e)?;
            }
            Self::TransactionConflict => {
                f.write_str("Concurrent database transaction conflict. Please retry request.")?;
            }
            Self::InternalError(s) => {
                f.write_str("Internal error: ")?;
                f.write_str(s)?;
            }
        };
        Ok(())
    }
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse {
        let message = format!("{}", self);

        if let Self::InvalidConfiguration(errors) = self {
            return HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .json(banner_api_types::ValidationErrorResponse {
                    http_code: self.status_code().as_u16(),
                    message,
                    fields: errors
                        .iter()
                        .map(|e| (e.field.key().to_owned(), e.message.to_owned()))
                        .collect(),
                });
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({
                "httpCode": self.status_code().as_u16(),
                "message": message
            }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson(e) => match e {
                JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                JsonPayloadError::Deserialize(json_error) if json_error.is_data() => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidConfiguration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TransactionConflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConnectionError(error) => {
                Self::InternalError(format!("Could not connect to database: {}", error))
            }
            StoreError::QueryError(diesel_error) => Self::InternalError(format!(
                "Error while executing database query: {}",
                diesel_error
            )),
            StoreError::TransactionConflict => Self::TransactionConflict,
            StoreError::InvalidDataInDatabase(e) => Self::InternalError(format!(
                "Data queried from database could not be deserialized: {}",
                e
            )),
        }
    }
}

impl From<SaveError> for APIError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Invalid(errors) => Self::InvalidConfiguration(errors),
            SaveError::Store(e) => e.into(),
        }
    }
}

impl From<actix_web::error::BlockingError> for APIError {
    fn from(_e: actix_web::error::BlockingError) -> Self {
        APIError::InternalError(
            "Could not get thread from thread pool for synchronous database operation.".to_owned(),
        )
    }
}
