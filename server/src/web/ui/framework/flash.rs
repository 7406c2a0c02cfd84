// Inspiration: https://docs.rs/actix-session/latest/src/actix_session/session.rs.html
use actix_web::cookie::Cookie;
use actix_web::http::header::{HeaderValue, SET_COOKIE};
use actix_web::{HttpMessage, HttpRequest};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashType {
    Success,
    Warning,
    Error,
}

impl FlashType {
    /// Bootstrap alert class suffix for displaying a flash message of this type
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashType::Success => "success",
            FlashType::Warning => "warning",
            FlashType::Error => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessage {
    pub flash_type: FlashType,
    pub message: String,
}

struct Flashes {
    flashes: Vec<FlashMessage>,
    dirty: bool,
}

const COOKIE_NAME: &str = "banner_flash";

impl Flashes {
    fn from_cookie(request: &HttpRequest) -> Result<Self, serde_json::Error> {
        let flashes = match request.cookie(COOKIE_NAME) {
            Some(cookie) if !cookie.value().is_empty() => serde_json::from_str(cookie.value())?,
            _ => vec![],
        };
        Ok(Flashes {
            flashes,
            dirty: false,
        })
    }

    fn into_cookie(self) -> Result<Cookie<'static>, serde_json::Error> {
        let mut result = Cookie::new(COOKIE_NAME, serde_json::to_string(&self.flashes)?);
        result.set_path("/");
        Ok(result)
    }
}

/// Extension trait for storing flash messages in the request, to be shown on the next page that
/// is rendered (either the current response or, after a redirect, the next one)
pub trait FlashesInterface {
    fn add_flash_message(&self, flash: FlashMessage);

    fn get_and_clear_flashes(&self) -> Vec<FlashMessage>;
}

impl FlashesInterface for HttpRequest {
    fn add_flash_message(&self, flash: FlashMessage) {
        if let Some(flashes) = self.extensions_mut().get_mut::<Flashes>() {
            flashes.flashes.push(flash);
            flashes.dirty = true;
            return;
        }
        // Must not be within the `if let` statement to avoid panicking of the `extensions` RefCell
        self.extensions_mut().insert(Flashes {
            flashes: vec![flash],
            dirty: true,
        });
    }

    fn get_and_clear_flashes(&self) -> Vec<FlashMessage> {
        self.extensions_mut()
            .get_mut::<Flashes>()
            .map(|flashes| {
                flashes.dirty = true;
                std::mem::take(&mut flashes.flashes)
            })
            .unwrap_or_default()
    }
}

pub async fn flash_middleware(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<impl actix_web::body::MessageBody>,
) -> Result<actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>, actix_web::Error> {
    match Flashes::from_cookie(req.request()) {
        Ok(flashes) => {
            req.extensions_mut().insert(flashes);
        }
        // Ignore broken flash cookies
        Err(e) => warn!("Could not parse flash message cookie: {}", e),
    }

    let mut response = next.call(req).await?;

    let flashes = response.request().extensions_mut().remove::<Flashes>();
    if let Some(flashes) = flashes {
        if flashes.dirty {
            let cookie = flashes
                .into_cookie()
                .map_err(actix_web::error::ErrorInternalServerError)?;
            let val = HeaderValue::from_str(&cookie.encoded().to_string())?;
            response.headers_mut().append(SET_COOKIE, val);
        }
    }
    Ok(response)
}
