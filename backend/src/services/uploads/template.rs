use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::upload::UploadedTemplate;

use crate::error::ApiError;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Handler for `POST /upload/template`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let (raw_name, bytes) = super::read_file_field(payload).await?;
    let filename = super::sanitize_filename(&raw_name)?.to_string();

    if !super::has_allowed_extension(&filename, &ALLOWED_EXTENSIONS) {
        return Err(ApiError::Validation("file must be PNG or JPG".into()));
    }

    let key = format!("templates/{filename}");
    state.uploads.put(&key, &bytes)?;
    log::info!("stored template {key} ({} bytes)", bytes.len());

    Ok(HttpResponse::Ok().json(UploadedTemplate {
        filename,
        path: format!("uploads/{key}"),
    }))
}
