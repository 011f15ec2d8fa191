use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use gestorbot_web::{AppState, HttpGestorApi, build_router, graceful_shutdown, logging_middleware};

/// The web front end for GestorBot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the GestorBot backend API.
    #[arg(long, default_value = "http://localhost:5000")]
    api_url: String,

    /// The port to serve the pages from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, used to pick the current month.
    #[arg(long, default_value = "America/Sao_Paulo")]
    timezone: String,

    /// How long to wait for the backend, in milliseconds. Receipt extraction can be slow.
    #[arg(long, default_value_t = 120_000)]
    request_timeout_ms: u64,

    /// Log request and response bodies.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let api = HttpGestorApi::new(
        &args.api_url,
        Duration::from_millis(args.request_timeout_ms),
    )
    .expect("Could not create the backend API client.");
    let app_state = AppState::new(&secret, &args.timezone, Arc::new(api));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let mut router = add_tracing_layer(build_router(app_state));

    if args.log_bodies {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {} using the backend at {}",
        addr,
        args.api_url
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            filter::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter::EnvFilter::new("debug")),
        )
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
