mod access;
mod options;
mod store;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::access::AccessPolicy;
use crate::options::{AddonOptions, Args};
use crate::store::{ZonesFile, ZONES_FILE_NAME};

#[derive(Clone)]
pub struct AppState {
    zones: Arc<ZonesFile>,
    access: Arc<AccessPolicy>,
    static_root: PathBuf,
}

#[derive(Clone, Debug)]
struct ServerConfig {
    addr: SocketAddr,
    data_dir: PathBuf,
    static_root: PathBuf,
    options_file: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Self {
        let default_addr = SocketAddr::from(([0, 0, 0, 0], 8000));
        let addr = match env::var("ZONES_ADDR") {
            Ok(v) => v.parse().unwrap_or_else(|err| {
                warn!("invalid ZONES_ADDR {v:?} ({err}), using {default_addr}");
                default_addr
            }),
            Err(_) => default_addr,
        };
        let data_dir = env_var_path("ZONES_DATA_DIR", PathBuf::from("/data"));
        Self {
            addr,
            static_root: env_var_path("ZONES_STATIC_ROOT", PathBuf::from("static")),
            options_file: env_var_path("ZONES_OPTIONS_FILE", data_dir.join("options.json")),
            data_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ServerConfig::from_env();

    let options = match AddonOptions::load(&config.options_file).await {
        Ok(options) => options,
        Err(err) => {
            warn!(
                "failed to read options from {}: {err}",
                config.options_file.display()
            );
            AddonOptions::default()
        }
    };
    info!(?options, "loaded options");

    let policy = AccessPolicy::new(options.allow_all_ips || args.allow_all_ips);
    info!(allow_all_ips = policy.allow_all(), "access policy");

    let zones = ZonesFile::new(config.data_dir.join(ZONES_FILE_NAME));
    match zones.ensure_exists().await {
        Ok(true) => info!("seeded empty {}", zones.path().display()),
        Ok(false) => {}
        Err(err) => {
            error!("failed to prepare {}: {err}", zones.path().display());
            return;
        }
    }

    let state = AppState {
        zones: Arc::new(zones),
        access: Arc::new(policy),
        static_root: config.static_root.clone(),
    };
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {err}", config.addr);
            return;
        }
    };
    info!("zones editor listening on http://{}", config.addr);
    if let Err(err) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("server stopped: {err}");
    }
}

/// `zones.json` and `healthz` are public; editor assets and saves go through
/// the access policy.
fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let guarded = Router::new()
        .route("/save_zones", post(save_zones))
        .fallback_service(ServeDir::new(&state.static_root))
        .layer(middleware::from_fn_with_state(
            state.access.clone(),
            access::require_allowed,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/zones.json", get(get_zones))
        .merge(guarded)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_zones(State(state): State<AppState>, request_headers: HeaderMap) -> Response {
    let body = match state.zones.read().await {
        Ok(body) => body,
        Err(err) => {
            error!("zones read failed: {err}");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "zones unavailable")
                .into_response();
        }
    };

    let etag = format!("\"{}\"", formats::content_hash(body.as_bytes()));
    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(http::header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(http::header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    if let Ok(v) = HeaderValue::from_str(&etag) {
        headers.insert(http::header::ETAG, v);
    }

    let unchanged = request_headers
        .get(http::header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == etag);
    if unchanged {
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }

    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (StatusCode::OK, headers, Body::from(body)).into_response()
}

async fn save_zones(State(state): State<AppState>, body: Bytes) -> Response {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(err) => {
            warn!("rejected zones document: {err}");
            return api_error(StatusCode::BAD_REQUEST, "zones document is not UTF-8")
                .into_response();
        }
    };
    let zones = match formats::decode(text) {
        Ok(zones) => zones,
        Err(err) => {
            warn!("rejected zones document: {err}");
            return api_error(StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    if let Err(err) = state.zones.write(text).await {
        error!("zones write failed: {err}");
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, "zones write failed")
            .into_response();
    }
    info!(zones = zones.len(), "saved {ZONES_FILE_NAME}");
    Json(json!({ "status": "ok" })).into_response()
}

fn env_var_path(key: &str, default: PathBuf) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or(default)
}
