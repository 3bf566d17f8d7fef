use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ogmeta_server::config::Config;
use ogmeta_server::handlers;
use ogmeta_server::scrape::MetaScraper;
use ogmeta_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ogmeta_server=info,tower_http=info".parse().unwrap());

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 ogmeta server starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(
        timeout_secs = config.scrape.timeout.as_secs(),
        max_redirects = config.scrape.max_redirects,
        "📝 Configuration loaded"
    );

    // Parser readiness is checked here, once; a broken parser never serves.
    let scraper = MetaScraper::with_default_parser(&config.scrape)
        .unwrap_or_else(|e| panic!("Scraper failed to initialise: {e}"));
    info!("✅ HTML parser ready");

    // CORS: permissive in dev, restrictive in production.
    let cors = if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!(
            "🔒 CORS: restrictive (production mode). \
             Cross-origin requests will be denied."
        );
        CorsLayer::new()
    };

    let app_state = AppState {
        scraper: Arc::new(scraper),
    };

    // Prometheus metrics layer
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = handlers::api_routes()
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .layer(cors)
        .with_state(app_state);

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
