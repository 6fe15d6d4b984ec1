use axum::{extract::State, Extension, Json};
use insights_core::{ChannelShare, ChartPoint};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

pub(super) async fn revenue_series(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ChartPoint>>> {
    Json(ApiResponse::new(state.session.chart_series(), req_id.0))
}

pub(super) async fn channel_shares(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ChannelShare>>> {
    Json(ApiResponse::new(state.session.channel_shares(), req_id.0))
}
