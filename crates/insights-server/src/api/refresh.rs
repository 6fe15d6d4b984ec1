use axum::{extract::State, http::StatusCode, Extension, Json};
use insights_engine::RefreshOutcome;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct RefreshData {
    state: &'static str,
}

pub(super) async fn request_refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<RefreshData>>) {
    let outcome = state.session.request_refresh();
    tracing::info!(request_id = %req_id.0, ?outcome, "refresh requested");
    let (status, label) = match outcome {
        RefreshOutcome::Started => (StatusCode::ACCEPTED, "refreshing"),
        RefreshOutcome::AlreadyRefreshing => (StatusCode::OK, "already_refreshing"),
    };
    (
        status,
        Json(ApiResponse::new(RefreshData { state: label }, req_id.0)),
    )
}
