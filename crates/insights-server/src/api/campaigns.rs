use axum::{
    extract::{Query, State},
    Extension, Json,
};
use insights_core::CampaignRecord;
use insights_engine::{CampaignPage, DateRange, FilterOptions, QueryParams, ShowingRange};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CampaignTable {
    #[serde(flatten)]
    page: CampaignPage,
    showing: ShowingRange,
    has_previous: bool,
    has_next: bool,
}

impl From<CampaignPage> for CampaignTable {
    fn from(page: CampaignPage) -> Self {
        Self {
            showing: page.showing(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    pub(super) fn date_range(&self) -> Result<DateRange, insights_engine::EngineError> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TopQuery {
    pub limit: Option<usize>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub(super) async fn list_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ApiResponse<CampaignTable>>, ApiError> {
    let range = params
        .date_range()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let query = params
        .table_query()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    let page = state.session.table(&range, &query);
    Ok(Json(ApiResponse::new(CampaignTable::from(page), req_id.0)))
}

pub(super) async fn list_filter_options(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<FilterOptions>>, ApiError> {
    let range = query
        .date_range()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(
        state.session.filter_options(&range),
        req_id.0,
    )))
}

pub(super) async fn list_top_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopQuery>,
) -> Result<Json<ApiResponse<Vec<CampaignRecord>>>, ApiError> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let limit = query.limit.map(|n| n.max(1));
    Ok(Json(ApiResponse::new(
        state.session.top_campaigns(&range, limit),
        req_id.0,
    )))
}
