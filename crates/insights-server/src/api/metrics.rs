use axum::{
    extract::{Query, State},
    Extension, Json,
};
use insights_core::AggregateMetrics;

use crate::middleware::RequestId;

use super::campaigns::RangeQuery;
use super::{map_engine_error, ApiError, ApiResponse, AppState};

pub(super) async fn get_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<AggregateMetrics>>, ApiError> {
    let range = query
        .date_range()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(state.session.metrics(&range), req_id.0)))
}
