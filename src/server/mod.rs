pub mod openapi;

use crate::config::toml_config::{ProxyConfig, ServerConfig};
use crate::domain::model::{ErrorBody, LoadSearchApiRequest, MultipleLoadDetailReturn};
use crate::domain::ports::LoadSearch;
use crate::utils::error::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub const LOAD_SEARCH_PATH: &str = "/api/truckstop/load-search";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn LoadSearch>,
}

impl AppState {
    pub fn new(service: impl LoadSearch + 'static) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new().route(LOAD_SEARCH_PATH, post(load_search));

    if config.openapi {
        router = router.route("/openapi.json", get(openapi::document));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(state)
}

fn bad_request(error: Option<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error })).into_response()
}

/// `GetMultipleLoadDetailResults`: 200 with the flattened result, 400 with
/// `{ "error": ... }` whenever the search failed.
#[utoipa::path(
    post,
    path = "/api/truckstop/load-search",
    operation_id = "GetMultipleLoadDetailResults",
    request_body = LoadSearchApiRequest,
    responses(
        (status = 200, description = "Loads matching the criteria", body = MultipleLoadDetailReturn),
        (status = 400, description = "Validation failure or TruckStop error", body = ErrorBody)
    )
)]
async fn load_search(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoadSearchApiRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected load search body: {}", rejection.body_text());
            return bad_request(Some(rejection.body_text()));
        }
    };

    let result = state.service.get_multiple_load_detail_results(request).await;

    if result.has_error {
        return bad_request(result.error_message);
    }

    (StatusCode::OK, Json(result)).into_response()
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState, config: &ProxyConfig) -> Result<()> {
    let addr = config.bind_address()?;
    let app = create_router(state, &config.server);

    info!("Starting server on {}", addr);
    info!("Forwarding load searches to {}", config.truckstop.api_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
