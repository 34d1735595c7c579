use actix_web::http::header;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::StorageError;

/// Handler for `GET /download/{batch_id}`: streams the batch archive.
pub(crate) async fn process(
    state: web::Data<AppState>,
    batch_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = Uuid::parse_str(&batch_id.into_inner())
        .map_err(|_| ApiError::Validation("batch id must be a UUID".into()))?;

    let bytes = match state.output.get(&format!("{id}.zip")) {
        Ok(bytes) => bytes,
        Err(StorageError::NotFound(_)) => {
            return Err(ApiError::NotFound(
                "generated certificates not found".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"certificates_{id}.zip\""),
        ))
        .body(bytes))
}
