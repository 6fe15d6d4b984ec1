mod campaigns;
mod charts;
mod export;
mod metrics;
mod refresh;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use insights_engine::{DashboardSession, EngineError, RefreshState};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<DashboardSession>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    refresh: RefreshState,
    live_updates: bool,
    records: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Malformed query parameters are the caller's fault.
pub(super) fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    tracing::debug!(error = %error, "rejected query parameters");
    ApiError::new(request_id, "bad_request", error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/campaigns", get(campaigns::list_campaigns))
        .route(
            "/api/v1/campaigns/filters",
            get(campaigns::list_filter_options),
        )
        .route("/api/v1/campaigns/top", get(campaigns::list_top_campaigns))
        .route("/api/v1/metrics", get(metrics::get_metrics))
        .route("/api/v1/charts/revenue", get(charts::revenue_series))
        .route("/api/v1/charts/channels", get(charts::channel_shares))
        .route("/api/v1/refresh", post(refresh::request_refresh))
        .route(
            "/api/v1/export/campaigns.csv",
            get(export::export_campaigns_csv),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let session = &state.session;
    let records = session.store().len();
    let status = if records == 0 && session.is_refreshing() {
        "loading"
    } else {
        "ok"
    };
    Json(ApiResponse::new(
        HealthData {
            status,
            refresh: session.refresh_state(),
            live_updates: session.is_live(),
            records,
        },
        req_id.0,
    ))
}
