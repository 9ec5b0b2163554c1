mod aggregator;
mod backends;
mod bus;
mod config;
mod errors;
mod metrics;
mod models;
mod providers;
mod routes;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::aggregator::Gateway;
use crate::backends::{GeoBackend, MetricsBackend, WeatherBackend};
use crate::bus::{Action, ActionRouter, Bus, GEO_SERVICE, METRICS_SERVICE, WEATHER_SERVICE};
use crate::metrics::UvService;
use crate::providers::{CurrentUvIndexClient, OpenWeatherClient};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clima Gateway",
        description = "Aggregates current weather, air quality (IQAr) and UV exposure for a \
            place name or coordinate.\n\n\
            Requests are forwarded over an action bus to the geo, weather and metrics backends.",
        version = "1.0.0"
    ),
    paths(
        routes::health::health,
        routes::location::location,
        routes::location_data::location_data,
    ),
    components(schemas(
        models::PlaceInfo, models::Coordinate, models::CompassPoint,
        models::AggregatedWeatherRecord, models::AirQualitySummary,
        metrics::iqar::Pollutant, metrics::iqar::AirQualityCategory,
        metrics::uv::UvSample, metrics::uv::UvLevel,
    )),
    tags(
        (name = "System", description = "Health and status"),
        (name = "Location", description = "Place lookup and aggregated weather"),
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let cfg = config::Config::from_env();

    let http = reqwest::Client::builder()
        .timeout(cfg.provider_timeout)
        .build()
        .map_err(std::io::Error::other)?;

    let openweather = Arc::new(OpenWeatherClient::new(http.clone(), cfg.openweather()));
    let uv = Arc::new(UvService::new(Arc::new(CurrentUvIndexClient::new(
        http,
        cfg.uv_api_url.clone(),
    ))));

    let router = ActionRouter::new()
        .route(
            GEO_SERVICE,
            Action::GetCityInfo,
            GeoBackend::new(openweather.clone()),
        )
        .route(
            WEATHER_SERVICE,
            Action::GetWeatherInfo,
            WeatherBackend::new(openweather.clone()),
        )
        .route(
            METRICS_SERVICE,
            Action::GetWeatherMetrics,
            MetricsBackend::new(openweather, uv),
        );
    let bus: Arc<dyn Bus> = Arc::new(router);
    if let Err(err) = bus.connect().await {
        log::error!("Failed to connect to the message bus: {err}");
    }

    let gateway = web::Data::new(Gateway::new(bus.clone(), cfg.backend_timeout));

    let bind = format!("{}:{}", cfg.host, cfg.port);
    log::info!("Starting Clima Gateway on {bind}");
    log::info!("Swagger UI: http://{bind}/docs/");

    let openapi = ApiDoc::openapi();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(
                Logger::new(r#"%a "%r" %s %b %Dms "%{User-Agent}i""#)
                    .exclude("/health"),
            )
            .wrap(Cors::permissive())
            .app_data(gateway.clone())
            .service(SwaggerUi::new("/docs/{_:.*}").url("/openapi.json", openapi.clone()))
            .configure(routes::configure_routes)
    })
    .bind(&bind)?
    .run()
    .await;

    bus.close().await;
    log::info!("Message bus closed");
    result
}
