//! Form-data extraction endpoint

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ExtractFormDataRequest, ExtractFormDataResponse, Json};

/// POST /v1/form-data/extract
///
/// Always succeeds; an empty `form_data` means nothing could be extracted.
pub async fn extract_form_data(
    State(state): State<AppState>,
    Json(request): Json<ExtractFormDataRequest>,
) -> Json<ExtractFormDataResponse> {
    let form_data = state.extractor.extract_form_data(&request.history).await;
    let missing_fields = form_data.missing_fields(&request.required_fields);

    info!(
        turns = request.history.len(),
        extracted = form_data.len(),
        missing = missing_fields.len(),
        "Form data extraction finished"
    );

    Json(ExtractFormDataResponse {
        form_data,
        missing_fields,
    })
}
