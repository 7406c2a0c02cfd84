use crate::banner::configuration::{
    BannerType, Configuration, ConfigurationCandidate, Field, SaveError, Style, ValidationErrors,
};
use crate::i18n::translate;
use crate::settings_store::StoreError;
use crate::web::ui::base_template::BaseTemplateContext;
use crate::web::ui::error::AppError;
use crate::web::ui::form_values::{BoolFormValue, FormValue};
use crate::web::ui::framework::flash::{FlashMessage, FlashType, FlashesInterface};
use crate::web::ui::sub_templates::form_inputs::{
    CheckboxTemplate, SelectEntry, SelectTemplate, TextareaTemplate,
};
use crate::web::AppState;
use actix_web::http::header::ContentType;
use actix_web::web::Form;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use askama::Template;
use log::info;
use serde::Deserialize;
use std::borrow::Cow;

#[get("/config")]
pub async fn config_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let store = state.store.clone();
    let configuration = web::block(move || -> Result<_, AppError> {
        let mut store = store.get_facade()?;
        Ok(Configuration::load(store.as_mut())?)
    })
    .await??;

    let form_data: ConfigurationFormData = configuration.into();
    let tmpl = ConfigFormTemplate::new(&req, &state, &form_data);
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(tmpl.render()?))
}

#[post("/config")]
pub async fn save_config(
    state: web::Data<AppState>,
    data: Form<ConfigurationFormData>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let mut form_data = data.into_inner();
    let candidate = form_data.to_candidate();
    let store = state.store.clone();
    let result = web::block(move || -> Result<_, SaveError> {
        let mut store = store.get_facade()?;
        Configuration::save(store.as_mut(), &candidate)
    })
    .await?;

    let mut response = HttpResponse::Ok();
    match result {
        Ok(configuration) => {
            info!("Banner configuration has been changed via admin form.");
            form_data = configuration.into();
            req.add_flash_message(FlashMessage {
                flash_type: FlashType::Success,
                message: translate("The configuration has been saved.", &state.locale).to_owned(),
            });
        }
        Err(SaveError::Invalid(errors)) => {
            form_data.add_validation_errors(&errors, &state.locale);
            req.add_flash_message(FlashMessage {
                flash_type: FlashType::Error,
                message: translate(
                    "The submitted data is invalid. Please check the marked fields.",
                    &state.locale,
                )
                .to_owned(),
            });
        }
        Err(SaveError::Store(StoreError::TransactionConflict)) => {
            req.add_flash_message(FlashMessage {
                flash_type: FlashType::Warning,
                message: translate(
                    "Could not save due to concurrent database access. Please submit the form again.",
                    &state.locale,
                )
                .to_owned(),
            });
            response = HttpResponse::ServiceUnavailable();
        }
        Err(e) => return Err(e.into()),
    }

    let tmpl = ConfigFormTemplate::new(&req, &state, &form_data);
    Ok(response
        .content_type(ContentType::html())
        .body(tmpl.render()?))
}

#[derive(Deserialize, Default)]
struct ConfigurationFormData {
    enabled: BoolFormValue,
    #[serde(rename = "closeButton")]
    close_button: BoolFormValue,
    style: FormValue<Style>,
    #[serde(rename = "bannerType")]
    banner_type: FormValue<BannerType>,
    content: FormValue<String>,
    #[serde(rename = "contentGuests")]
    content_guests: FormValue<String>,
}

impl ConfigurationFormData {
    fn to_candidate(&self) -> ConfigurationCandidate {
        ConfigurationCandidate {
            enabled: self.enabled.submitted_value().to_owned(),
            content: self.content.submitted_value().map(str::to_owned),
            content_guests: self.content_guests.submitted_value().map(str::to_owned),
            close_button: self.close_button.submitted_value().to_owned(),
            style: self.style.string_value().to_owned(),
            banner_type: self.banner_type.string_value().to_owned(),
        }
    }

    fn add_validation_errors(&mut self, errors: &ValidationErrors, locale: &str) {
        for error in errors.iter() {
            let message = translate(error.message, locale).to_owned();
            match error.field {
                Field::Enabled => self.enabled.add_error(message),
                Field::CloseButton => self.close_button.add_error(message),
                Field::Style => self.style.add_error(message),
                Field::BannerType => self.banner_type.add_error(message),
                Field::Content => self.content.add_error(message),
                Field::ContentGuests => self.content_guests.add_error(message),
            }
        }
    }
}

impl From<Configuration> for ConfigurationFormData {
    fn from(value: Configuration) -> Self {
        Self {
            enabled: value.enabled.into(),
            close_button: value.close_button.into(),
            style: value.style.into(),
            banner_type: value.banner_type.into(),
            content: value.content.into(),
            content_guests: value.content_guests.into(),
        }
    }
}

/// Example for the CSS custom properties of the banner that can be overwritten by the host
const CSS_EXAMPLE: &str = r#"<style>
    :root {
        --hh-banner-height: 60px; /** default 40px */
        --hh-banner-font-color: var(--text-color-contrast); /** default var(--text-color-contrast) */
        --hh-banner-bg-color: var(--danger); /** default var(--info) */
    }
</style>"#;

#[derive(Template)]
#[template(path = "config.html")]
struct ConfigFormTemplate<'a> {
    base: BaseTemplateContext<'a>,
    form_data: &'a ConfigurationFormData,
    /// Content of the configuration may be replaced by a content override
    override_active: bool,
    style_entries: Vec<SelectEntry<'a>>,
    banner_type_entries: Vec<SelectEntry<'a>>,
    css_example: &'static str,
}

impl<'a> ConfigFormTemplate<'a> {
    fn new(
        request: &'a HttpRequest,
        state: &'a AppState,
        form_data: &'a ConfigurationFormData,
    ) -> Self {
        let locale = state.locale.as_str();
        let registered_types = state.selector.templates().registered_types();
        let no_content_hint = translate("No built-in content available for this type.", locale);
        Self {
            base: BaseTemplateContext {
                request,
                page_title: "Banner configuration",
                locale,
            },
            form_data,
            override_active: state.selector.has_active_override(),
            style_entries: Style::ALL
                .iter()
                .map(|style| SelectEntry {
                    value: Cow::Borrowed(style.as_str()),
                    text: Cow::Borrowed(translate(style.label(), locale)),
                })
                .collect(),
            banner_type_entries: BannerType::ALL
                .iter()
                .map(|banner_type| SelectEntry {
                    value: Cow::Borrowed(banner_type.as_str()),
                    text: if *banner_type == BannerType::Manual
                        || registered_types.contains(banner_type)
                    {
                        Cow::Borrowed(translate(banner_type.label(), locale))
                    } else {
                        Cow::Owned(format!(
                            "{} ({})",
                            translate(banner_type.label(), locale),
                            no_content_hint
                        ))
                    },
                })
                .collect(),
            css_example: CSS_EXAMPLE,
        }
    }

    fn label(&self, field: Field) -> &'static str {
        translate(field.label(), self.base.locale)
    }

    fn enabled_input(&self) -> Result<String, askama::Error> {
        CheckboxTemplate::new(
            &self.form_data.enabled,
            Field::Enabled.key(),
            self.label(Field::Enabled),
            None,
        )
        .render()
    }

    fn close_button_input(&self) -> Result<String, askama::Error> {
        CheckboxTemplate::new(
            &self.form_data.close_button,
            Field::CloseButton.key(),
            self.label(Field::CloseButton),
            None,
        )
        .render()
    }

    fn style_input(&self) -> Result<String, askama::Error> {
        SelectTemplate::new(
            &self.form_data.style,
            Field::Style.key(),
            &self.style_entries,
            self.label(Field::Style),
            None,
        )
        .render()
    }

    fn banner_type_input(&self) -> Result<String, askama::Error> {
        SelectTemplate::new(
            &self.form_data.banner_type,
            Field::BannerType.key(),
            &self.banner_type_entries,
            self.label(Field::BannerType),
            None,
        )
        .render()
    }

    fn content_input(&self) -> Result<String, askama::Error> {
        self.textarea(&self.form_data.content, Field::Content)
    }

    fn content_guests_input(&self) -> Result<String, askama::Error> {
        self.textarea(&self.form_data.content_guests, Field::ContentGuests)
    }

    fn textarea(&self, data: &FormValue<String>, field: Field) -> Result<String, askama::Error> {
        TextareaTemplate::new(
            data,
            field.key(),
            self.label(field),
            6,
            Some(self.base.t(
                "Only used for the banner type \"Manual\". Other types show their built-in content.",
            )),
        )
        .render()
    }
}

#[cfg(test)]
mod tests {
    use crate::settings_store::store_mock::StoreMock;
    use crate::settings_store::StoreError;
    use crate::web::test_util::app_state;
    use crate::web::ui::configure_app;
    use crate::web::IntegrationMode;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use std::sync::Arc;

    macro_rules! admin_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(app_state($store, IntegrationMode::Inline)))
                    .configure(configure_app),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_config_form_shows_current_values() {
        let store = Arc::new(StoreMock::default());
        {
            let mut data = store.data.lock().unwrap();
            data.insert("banner", "style", "danger");
            data.insert("banner", "content", "Welcome aboard");
        }
        let app = admin_app!(store.clone());
        let req = test::TestRequest::get().uri("/banner/config").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains(r#"<option value="danger" selected>Danger</option>"#));
        assert!(body.contains("Welcome aboard</textarea>"));
        assert!(body.contains(r#"name="contentGuests""#));
        assert!(body.contains("--hh-banner-bg-color"));
        // The banner is disabled, so the admin page does not show it
        assert!(!body.contains(r#"id="banner""#));
    }

    #[actix_web::test]
    async fn test_save_config() {
        let store = Arc::new(StoreMock::default());
        let app = admin_app!(store.clone());
        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([
                ("enabled", "1"),
                ("closeButton", "1"),
                ("style", "warning"),
                ("bannerType", "manual"),
                ("content", "  <b>Storm warning</b>  "),
                ("contentGuests", ""),
            ])
            .insert_header(("X-Banner-Viewer", "authenticated"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("The configuration has been saved."));
        // The saved banner is shown on the admin page right away
        assert!(body.contains(
            r#"<div id="banner" class="alert alert-warning alert-dismissible" role="alert">"#
        ));

        let data = store.data.lock().unwrap();
        assert_eq!(data.get("banner", "enabled"), Some("1"));
        assert_eq!(data.get("banner", "style"), Some("warning"));
        assert_eq!(data.get("banner", "content"), Some("<b>Storm warning</b>"));
        assert_eq!(data.get("banner", "contentGuests"), Some(""));
        assert_eq!(data.write_calls, 1);
    }

    #[actix_web::test]
    async fn test_save_config_unchecked_checkboxes() {
        let store = Arc::new(StoreMock::default());
        store.data.lock().unwrap().insert("banner", "enabled", "1");
        let app = admin_app!(store.clone());
        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([
                ("style", "info"),
                ("bannerType", "manual"),
                ("content", "x"),
                ("contentGuests", "y"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let data = store.data.lock().unwrap();
        assert_eq!(data.get("banner", "enabled"), Some("0"));
        assert_eq!(data.get("banner", "closeButton"), Some("0"));
    }

    #[actix_web::test]
    async fn test_save_config_boolean_values_are_validated() {
        let store = Arc::new(StoreMock::default());
        store.data.lock().unwrap().insert("banner", "enabled", "1");
        let app = admin_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([
                ("enabled", "1"),
                ("closeButton", "maybe"),
                ("style", "info"),
                ("bannerType", "manual"),
                ("content", "x"),
                ("contentGuests", "y"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Must be a boolean value."));
        assert_eq!(store.data.lock().unwrap().write_calls, 0);

        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([
                ("enabled", "0"),
                ("closeButton", "yes"),
                ("style", "info"),
                ("bannerType", "manual"),
                ("content", "x"),
                ("contentGuests", "y"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let data = store.data.lock().unwrap();
        assert_eq!(data.write_calls, 1);
        assert_eq!(data.get("banner", "enabled"), Some("0"));
        assert_eq!(data.get("banner", "closeButton"), Some("1"));
    }

    #[actix_web::test]
    async fn test_save_invalid_config() {
        let store = Arc::new(StoreMock::default());
        store.data.lock().unwrap().insert("banner", "style", "info");
        let app = admin_app!(store.clone());
        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([
                ("enabled", "1"),
                ("style", "purple"),
                ("bannerType", "manual"),
                ("content", "Hi"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("The submitted data is invalid."));
        assert!(body.contains("Style must be one of info, success, warning or danger."));
        assert!(body.contains("is-invalid"));

        let data = store.data.lock().unwrap();
        assert_eq!(data.write_calls, 0);
        assert_eq!(data.get("banner", "style"), Some("info"));
        assert_eq!(data.get("banner", "enabled"), None);
    }

    #[actix_web::test]
    async fn test_save_config_transaction_conflict() {
        let store = Arc::new(StoreMock::default());
        let app = admin_app!(store.clone());
        store.data.lock().unwrap().next_error = Some(StoreError::TransactionConflict);
        let req = test::TestRequest::post()
            .uri("/banner/config")
            .set_form([("style", "info"), ("bannerType", "manual")])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Could not save due to concurrent database access."));
    }
}
