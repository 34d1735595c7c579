//! Asset intake: template images and tabular datasets.
//!
//! Both endpoints accept a multipart form with a single `file` part and
//! persist the bytes verbatim into the upload store under the original
//! filename (last write wins; there is no deduplication). The provided
//! routes are:
//!
//! - `POST /upload/template`: stores a PNG/JPG certificate template under
//!   `templates/{filename}`. Any other extension is rejected.
//!
//! - `POST /upload/excel`: stores a CSV/XLS/XLSX dataset under
//!   `excel/{filename}`, then parses it and returns the column names, the
//!   first five rows and the total row count. The file is stored before it
//!   is parsed, so a malformed upload is kept on disk even though the
//!   request reports a parse error.

use std::path::Path;

use actix_multipart::Multipart;
use actix_web::web::{post, scope};
use actix_web::Scope;
use futures_util::StreamExt;

use crate::error::ApiError;

pub(crate) mod dataset;
mod template;

const API_PATH: &str = "/upload";

/// Configures and returns the Actix scope for upload routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/template", post().to(template::process))
        .route("/excel", post().to(dataset::process))
}

/// Pull the `file` part out of a multipart payload, returning the client
/// filename and the raw bytes.
async fn read_file_field(mut payload: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ApiError::Validation(format!("invalid multipart payload: {e}")))?;

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| ApiError::Validation(format!("upload stream failed: {e}")))?;
            bytes.extend_from_slice(&chunk);
        }
        return Ok((filename, bytes));
    }
    Err(ApiError::Validation("missing 'file' field".into()))
}

/// Validate a client-supplied filename as a flat name usable as a store key
/// segment: no separators, no traversal, no control characters.
fn sanitize_filename(raw: &str) -> Result<&str, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("filename must not be empty".into()));
    }
    if name.contains('\0') || name.chars().any(|c| c.is_ascii_control()) {
        return Err(ApiError::Validation(
            "filename must not contain control characters".into(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ApiError::Validation(
            "filename must not contain path separators".into(),
        ));
    }
    if name.starts_with('.') {
        return Err(ApiError::Validation(
            "filename must not start with '.'".into(),
        ));
    }
    Ok(name)
}

/// Case-insensitive extension allow-list check.
fn has_allowed_extension(filename: &str, allowed: &[&str]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| allowed.contains(&e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        let allowed = ["png", "jpg", "jpeg"];
        assert!(has_allowed_extension("cert.png", &allowed));
        assert!(has_allowed_extension("cert.PNG", &allowed));
        assert!(has_allowed_extension("cert.Jpeg", &allowed));
        assert!(!has_allowed_extension("cert.txt", &allowed));
        assert!(!has_allowed_extension("cert", &allowed));
        assert!(!has_allowed_extension("png", &allowed));
    }

    #[test]
    fn sane_filenames_pass() {
        assert_eq!(sanitize_filename("cert.png").unwrap(), "cert.png");
        assert_eq!(sanitize_filename(" list 2026.xlsx ").unwrap(), "list 2026.xlsx");
    }

    #[test]
    fn hostile_filenames_are_rejected() {
        for raw in [
            "",
            "   ",
            "../../etc/passwd",
            "a/b.png",
            "a\\b.png",
            ".hidden",
            "..",
            "crlf\r\n.png",
        ] {
            assert!(
                sanitize_filename(raw).is_err(),
                "filename {raw:?} should be rejected"
            );
        }
    }
}
