use crate::banner::configuration::{Configuration, ConfigurationCandidate};
use crate::banner::selector::Viewer;
use crate::web::api::APIError;
use crate::web::AppState;
use actix_web::{get, put, web, Responder};
use serde::Deserialize;

#[get("/configuration")]
async fn get_configuration(state: web::Data<AppState>) -> Result<impl Responder, APIError> {
    let configuration = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(Configuration::load(store.as_mut())?)
    })
    .await??;

    Ok(web::Json(banner_api_types::BannerConfiguration::from(
        configuration,
    )))
}

#[put("/configuration")]
async fn update_configuration(
    data: web::Json<banner_api_types::BannerConfiguration>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let candidate = ConfigurationCandidate::from(data.into_inner());
    let saved = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(Configuration::save(store.as_mut(), &candidate)?)
    })
    .await??;

    Ok(web::Json(banner_api_types::BannerConfiguration::from(saved)))
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ViewerParameter {
    Guest,
    Authenticated,
}

#[derive(Deserialize)]
struct DecisionQuery {
    viewer: Option<ViewerParameter>,
}

impl From<ViewerParameter> for Viewer {
    fn from(value: ViewerParameter) -> Self {
        match value {
            ViewerParameter::Guest => Viewer::Guest,
            ViewerParameter::Authenticated => Viewer::Authenticated,
        }
    }
}

#[get("/decision")]
async fn get_decision(
    query: web::Query<DecisionQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let viewer = query
        .into_inner()
        .viewer
        .map(Viewer::from)
        .unwrap_or(Viewer::Guest);
    let store = state.store.clone();
    let configuration = web::block(move || -> Result<_, APIError> {
        let mut store = store.get_facade()?;
        Ok(Configuration::load(store.as_mut())?)
    })
    .await??;

    Ok(web::Json(banner_api_types::RenderDecision::from(
        state.selector.resolve(&configuration, viewer),
    )))
}

#[cfg(test)]
mod tests {
    use crate::settings_store::store_mock::StoreMock;
    use crate::settings_store::StoreError;
    use crate::web::api::configure_app;
    use crate::web::test_util::app_state;
    use crate::web::IntegrationMode;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use banner_api_types::{BannerConfiguration, RenderDecision, ValidationErrorResponse};
    use std::sync::Arc;

    fn store(entries: &[(&str, &str)]) -> Arc<StoreMock> {
        let store = StoreMock::default();
        {
            let mut data = store.data.lock().unwrap();
            for (name, value) in entries {
                data.insert("banner", name, value);
            }
        }
        Arc::new(store)
    }

    fn sample_configuration() -> BannerConfiguration {
        BannerConfiguration {
            enabled: true,
            content: Some("Maintenance tonight".to_owned()),
            content_guests: Some("".to_owned()),
            close_button: true,
            style: "warning".to_owned(),
            banner_type: "manual".to_owned(),
        }
    }

    #[actix_web::test]
    async fn test_get_configuration_defaults() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store(&[]),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/configuration")
            .to_request();
        let configuration: BannerConfiguration = test::call_and_read_body_json(&app, req).await;
        assert!(!configuration.enabled);
        assert_eq!(configuration.content.as_deref(), Some(""));
        assert_eq!(configuration.style, "info");
        assert_eq!(configuration.banner_type, "manual");
    }

    #[actix_web::test]
    async fn test_update_configuration() {
        let store = store(&[]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store.clone(),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/configuration")
            .set_json(sample_configuration())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let saved: BannerConfiguration = test::read_body_json(res).await;
        assert_eq!(saved, sample_configuration());

        let data = store.data.lock().unwrap();
        assert_eq!(data.write_calls, 1);
        assert_eq!(data.get("banner", "style"), Some("warning"));
        assert_eq!(data.get("banner", "closeButton"), Some("1"));
    }

    #[actix_web::test]
    async fn test_update_keeps_omitted_content() {
        let store = store(&[("content", "Keep me")]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store.clone(),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/configuration")
            .set_json(serde_json::json!({
                "enabled": true,
                "closeButton": false,
                "style": "danger",
                "bannerType": "manual"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let saved: BannerConfiguration = test::read_body_json(res).await;
        assert_eq!(saved.content.as_deref(), Some("Keep me"));
        assert_eq!(saved.content_guests.as_deref(), Some(""));

        let data = store.data.lock().unwrap();
        assert_eq!(data.get("banner", "content"), Some("Keep me"));
        assert_eq!(data.get("banner", "style"), Some("danger"));
    }

    #[actix_web::test]
    async fn test_update_invalid_configuration() {
        let store = store(&[("style", "danger")]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store.clone(),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let mut configuration = sample_configuration();
        configuration.style = "purple".to_owned();
        configuration.banner_type = "nonsense".to_owned();
        let req = test::TestRequest::put()
            .uri("/api/v1/configuration")
            .set_json(configuration)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let response: ValidationErrorResponse = test::read_body_json(res).await;
        assert_eq!(response.http_code, 422);
        assert_eq!(
            response.fields.keys().collect::<Vec<_>>(),
            vec!["bannerType", "style"]
        );

        let data = store.data.lock().unwrap();
        assert_eq!(data.write_calls, 0);
        assert_eq!(data.get("banner", "style"), Some("danger"));
    }

    #[actix_web::test]
    async fn test_update_malformed_json() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store(&[]),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/configuration")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"enabled\": tru")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_decision() {
        let store = store(&[
            ("enabled", "1"),
            ("content", "Hello members"),
            ("contentGuests", "Hello guests"),
            ("closeButton", "0"),
            ("style", "success"),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(store, IntegrationMode::Inline)))
                .configure(configure_app),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/decision?viewer=authenticated")
            .to_request();
        let decision: RenderDecision = test::call_and_read_body_json(&app, req).await;
        assert!(decision.show);
        assert_eq!(decision.content, "Hello members");
        assert_eq!(decision.style, "success");
        assert!(!decision.close_button);

        let req = test::TestRequest::get().uri("/api/v1/decision").to_request();
        let decision: RenderDecision = test::call_and_read_body_json(&app, req).await;
        assert_eq!(decision.content, "Hello guests");

        let req = test::TestRequest::get()
            .uri("/api/v1/decision?viewer=robot")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_store_errors() {
        let store = store(&[]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(
                    store.clone(),
                    IntegrationMode::Inline,
                )))
                .configure(configure_app),
        )
        .await;

        store.data.lock().unwrap().next_error = Some(StoreError::TransactionConflict);
        let req = test::TestRequest::put()
            .uri("/api/v1/configuration")
            .set_json(sample_configuration())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        store.data.lock().unwrap().next_error =
            Some(StoreError::ConnectionError("refused".to_owned()));
        let req = test::TestRequest::get()
            .uri("/api/v1/configuration")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
