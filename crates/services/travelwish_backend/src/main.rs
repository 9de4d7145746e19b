// File: services/travelwish_backend/src/main.rs
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use travelwish_config::load_config;

mod app_state;
use app_state::AppState;

#[tokio::main]
async fn main() {
    travelwish_common::logging::init_with_default("info");

    let config = Arc::new(load_config().expect("Failed to load config"));
    travelwish_common::http::set_development_mode(config.development);
    let state = AppState::new(config.clone())
        .await
        .expect("Failed to initialize application state");

    let mut api_router = Router::new()
        .route("/", get(|| async { "Welcome to the TravelWish API!" }))
        .merge(travelwish_bookings::routes(state.booking_state.clone()))
        .merge(travelwish_notify::routes(state.notify_state.clone()));

    if let Some(payment_state) = &state.payment_state {
        api_router = api_router.merge(travelwish_payments::routes(payment_state.clone()));
    }

    #[allow(unused_mut)] // mutated only when the openapi feature is on
    let mut app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use travelwish_bookings::doc::BookingApiDoc;
        use travelwish_notify::doc::NotifyApiDoc;
        use travelwish_payments::doc::PaymentApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "TravelWish API",
                version = "0.1.0",
                description = "Booking lifecycle, payments, and notifications",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "TravelWish", description = "Core service endpoints")),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        openapi_doc.merge(PaymentApiDoc::openapi());
        openapi_doc.merge(NotifyApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
