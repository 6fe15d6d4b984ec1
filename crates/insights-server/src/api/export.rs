use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use insights_engine::export::{CsvExporter, ExportAdapter};
use insights_engine::QueryParams;

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, AppState};

/// Every row passing the table filters, in table order, as a CSV download.
/// Pagination does not apply.
pub(super) async fn export_campaigns_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let range = params
        .date_range()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let query = params
        .table_query()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    let rows = state.session.export_rows(&range, &query);
    let artifact = CsvExporter::default()
        .export(&rows)
        .map_err(|e| ApiError::new(req_id.0.clone(), "internal_error", e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}
