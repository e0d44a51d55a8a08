use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{AsyncDieselConnectionManager, deadpool::Pool},
};
use dotenv::dotenv;
use eyre::WrapErr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::ServerConfig;
use json::Message;

mod comments;
mod config;
mod error;
mod identity;
mod json;
mod models;
mod posts;
mod schema;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    diesel: Pool<AsyncPgConnection>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    init_tracing(config::env_from_var());

    let config = ServerConfig::new_from_env();

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let diesel = Pool::builder(manager)
        .max_size(10)
        .runtime(deadpool_runtime::Runtime::Tokio1)
        .wait_timeout(Some(Duration::from_secs(10)))
        .build()
        .wrap_err("could not build the database pool")?;

    let listen_addr = config.listen_addr;
    let cors = cors_layer(&config.cors_allowed_origins);

    let app = router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(App { diesel });

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .wrap_err_with(|| format!("could not bind to {listen_addr}"))?;

    tracing::info!(%listen_addr, "the citadel is listening");

    axum::serve(listener, app)
        .await
        .wrap_err("server stopped unexpectedly")
}

fn router() -> Router<App> {
    Router::<App>::new()
        .route("/ping", get(ping))
        .merge(identity::routes::route())
        .merge(posts::routes::route())
        .merge(comments::routes::route())
}

async fn ping() -> Json<Message> {
    Json(Message { message: "pong" })
}

fn init_tracing(env: config::Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("citadel_api=debug,tower_http=debug,info"));

    let registry = tracing_subscriber::registry().with(filter);

    if env == config::Env::Production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, "ignoring invalid CORS origin: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
