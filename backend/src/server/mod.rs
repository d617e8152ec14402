//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
pub(crate) use metrics::default_metrics;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use allocations::Trace;
#[cfg(debug_assertions)]
use allocations::doc::ApiDoc;
use allocations::inbound::http::allocations::{
    create_allocation, delete_allocation, list_allocations, update_allocation,
};
use allocations::inbound::http::health::{HealthState, live, ready};
use allocations::inbound::http::state::HttpState;
use allocations::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(create_allocation)
        .service(list_allocations)
        .service(update_allocation)
        .service(delete_allocation);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .wrap(Cors::permissive())
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] with the bind address, optional pool
///   and optional metrics.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Route wiring checks for the assembled application.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use allocations::domain::TRACE_ID_HEADER;
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    fn deps() -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)))),
        }
    }

    #[actix_web::test]
    async fn api_routes_are_mounted_with_trace_header() {
        let app = actix_test::init_service(build_app(deps())).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/allocations")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn cross_origin_requests_are_allowed() {
        let app = actix_test::init_service(build_app(deps())).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/allocations")
            .insert_header(("origin", "http://example.com"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let allowed = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok());
        assert!(
            matches!(allowed, Some("http://example.com" | "*")),
            "unexpected allow-origin header: {allowed:?}"
        );
    }

    #[actix_web::test]
    async fn preflight_requests_are_answered() {
        let app = actix_test::init_service(build_app(deps())).await;

        let request = actix_test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/v1/allocations")
            .insert_header(("origin", "http://example.com"))
            .insert_header(("access-control-request-method", "POST"))
            .insert_header(("access-control-request-headers", "content-type"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert!(response.status().is_success());
        assert!(
            response
                .headers()
                .contains_key("access-control-allow-methods")
        );
    }

    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let app = actix_test::init_service(build_app(deps())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/allocations")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
        assert_eq!(
            body.get("traceId").and_then(Value::as_str),
            trace_id.as_deref()
        );
    }
}
