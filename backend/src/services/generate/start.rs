//! # Batch Generation Service
//!
//! This module provides the `POST /generate/certificate` endpoint, which
//! turns an uploaded template image plus a tabular dataset into one
//! certificate per row, a static verification site, and a downloadable
//! archive.
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: the `process` handler receives a `GenerateRequest`
//!     naming a stored template, a stored dataset, the column holding
//!     recipient names, the event metadata and the GitHub Pages identity.
//!
//! 2.  **Preconditions**: both assets must exist in the upload store, the
//!     dataset must parse, the name column must be one of its columns and
//!     the GitHub identity must be URL-safe. Any of these failing rejects
//!     the request before a single byte is written.
//!
//! 3.  **Background Processing**: the row loop runs on the blocking thread
//!     pool via `tokio::task::spawn_blocking`; image composition and file
//!     I/O would otherwise stall the async workers. The handler awaits the
//!     result and responds with the full batch report.
//!
//! 4.  **Per-row outcome**: a failing row never aborts the batch. It is
//!     logged and recorded in the report's `failed_rows`, so partial batches
//!     are visible to the caller instead of silently shrinking.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::batch::{BatchReport, RowFailure};
use common::model::certificate::{CertificateRecord, CertificateSummary};
use common::requests::GenerateRequest;
use regex::Regex;
use uuid::Uuid;

use super::{archive, compose, site};
use crate::error::ApiError;
use crate::fonts::FontLibrary;
use crate::services::uploads::dataset::{parse_dataset, Dataset};
use crate::state::AppState;
use crate::storage::ContentStore;

/// Number of certificate summaries echoed back in the response.
const PREVIEW_CERTIFICATES: usize = 5;

/// Handler for `POST /generate/certificate`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let report = run_batch(state.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Validate preconditions, then run the generation loop off the async
/// runtime.
async fn run_batch(state: &AppState, req: GenerateRequest) -> Result<BatchReport, ApiError> {
    validate_github_identity(&req.github_username, &req.github_repo)?;

    let template_key = format!("templates/{}", req.template);
    if !state.uploads.exists(&template_key)? {
        return Err(ApiError::NotFound(format!(
            "template file '{}' not found",
            req.template
        )));
    }
    let dataset_key = format!("excel/{}", req.excel_file);
    if !state.uploads.exists(&dataset_key)? {
        return Err(ApiError::NotFound(format!(
            "data file '{}' not found",
            req.excel_file
        )));
    }

    let template_bytes = state.uploads.get(&template_key)?;
    let dataset = parse_dataset(&req.excel_file, &state.uploads.get(&dataset_key)?)?;
    if dataset.column_index(&req.name_column).is_none() {
        return Err(ApiError::Validation(format!(
            "column '{}' not found in data file",
            req.name_column
        )));
    }

    let output = state.output.clone();
    let fonts = state.fonts.clone();
    let handle = tokio::task::spawn_blocking(move || {
        generate_batch(output.as_ref(), fonts.as_ref(), &req, &dataset, &template_bytes)
    });
    handle
        .await
        .map_err(|e| ApiError::Internal(format!("generation task failed: {e}")))?
}

/// The synchronous batch loop. Writes everything through the output store:
/// raw images under `certificates/{batch}`, the verification site under
/// `docs/{batch}`, and finally the archive at `{batch}.zip`.
fn generate_batch(
    store: &dyn ContentStore,
    fonts: &FontLibrary,
    req: &GenerateRequest,
    dataset: &Dataset,
    template_bytes: &[u8],
) -> Result<BatchReport, ApiError> {
    let batch_id = Uuid::new_v4().to_string();
    let base_url = format!(
        "https://{}.github.io/{}",
        req.github_username, req.github_repo
    );

    // Decode once; every row composites onto its own unmodified copy.
    let template = image::load_from_memory(template_bytes)?.to_rgba8();
    let name_column = dataset
        .column_index(&req.name_column)
        .ok_or_else(|| ApiError::Validation(format!("column '{}' not found", req.name_column)))?;

    let mut certificates = Vec::new();
    let mut failed_rows = Vec::new();

    for (row, cells) in dataset.rows.iter().enumerate() {
        let name = cells.get(name_column).cloned().unwrap_or_default();
        match generate_row(store, fonts, &batch_id, &base_url, req, &template, &name) {
            Ok(summary) => certificates.push(summary),
            Err(e) => {
                log::warn!("certificate generation failed for row {row} ({name:?}): {e}");
                failed_rows.push(RowFailure {
                    row,
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    site::write_shared_pages(store, &batch_id, &req.event_name)?;
    archive::archive_publish_dir(store, &batch_id)?;
    log::info!(
        "batch {batch_id}: {} certificates, {} failed rows",
        certificates.len(),
        failed_rows.len()
    );

    let total_certificates = certificates.len();
    certificates.truncate(PREVIEW_CERTIFICATES);
    Ok(BatchReport {
        download_url: format!("/download/{batch_id}"),
        github_base_url: base_url,
        total_certificates,
        certificates,
        failed_rows,
        batch_id,
    })
}

/// Produce one certificate: image, verification page, published copy and
/// metadata sidecar, all keyed by a fresh random identifier.
fn generate_row(
    store: &dyn ContentStore,
    fonts: &FontLibrary,
    batch_id: &str,
    base_url: &str,
    req: &GenerateRequest,
    template: &image::RgbaImage,
    name: &str,
) -> Result<CertificateSummary, ApiError> {
    let id = Uuid::new_v4().to_string();
    let verification_url = format!("{base_url}/verify.html?id={id}");

    let png = compose::compose_certificate(
        template.clone(),
        fonts,
        &compose::CertificateText {
            name,
            event: &req.event_name,
            date: &req.date,
        },
        &verification_url,
    )?;

    let record = CertificateRecord {
        id: id.clone(),
        name: name.to_string(),
        event: req.event_name.clone(),
        date: req.date.clone(),
        issued_at: Utc::now().to_rfc3339(),
    };

    store.put(&format!("certificates/{batch_id}/{id}.png"), &png)?;
    store.put(
        &format!("docs/{batch_id}/{id}.html"),
        site::verification_page(&record).as_bytes(),
    )?;
    store.put(&format!("docs/{batch_id}/{id}.png"), &png)?;
    store.put(
        &format!("docs/{batch_id}/{id}.json"),
        &serde_json::to_vec(&record)?,
    )?;

    Ok(CertificateSummary {
        image_url: format!("{id}.png"),
        verification_url: format!("{id}.html"),
        id,
        name: name.to_string(),
        event: req.event_name.clone(),
        date: req.date.clone(),
    })
}

/// The GitHub username and repository are interpolated into the
/// verification URL; restrict them to URL-safe name characters.
fn validate_github_identity(username: &str, repo: &str) -> Result<(), ApiError> {
    let re = Regex::new(r"^[A-Za-z0-9._-]+$")
        .map_err(|e| ApiError::Internal(format!("regex error: {e}")))?;
    if !re.is_match(username) {
        return Err(ApiError::Validation(
            "github username may only contain letters, digits, '.', '_' and '-'".into(),
        ));
    }
    if !re.is_match(repo) {
        return Err(ApiError::Validation(
            "github repository may only contain letters, digits, '.', '_' and '-'".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn request() -> GenerateRequest {
        GenerateRequest {
            template: "cert.png".into(),
            excel_file: "list.csv".into(),
            name_column: "name".into(),
            event_name: "RustConf 2026".into(),
            date: "2026-08-07".into(),
            github_username: "octocat".into(),
            github_repo: "certs".into(),
        }
    }

    fn template_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(640, 480, image::Rgba([255, 255, 255, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn dataset(csv: &str) -> Dataset {
        parse_dataset("list.csv", csv.as_bytes()).unwrap()
    }

    fn run(store: &MemoryStore, csv: &str) -> BatchReport {
        generate_batch(
            store,
            &FontLibrary::Builtin,
            &request(),
            &dataset(csv),
            &template_png(),
        )
        .unwrap()
    }

    #[test]
    fn every_row_yields_a_full_artifact_triple() {
        let store = MemoryStore::new();
        let report = run(&store, "name\nAda\nGrace\nLin\n");

        assert_eq!(report.total_certificates, 3);
        assert!(report.failed_rows.is_empty());

        let docs = store.list(&format!("docs/{}", report.batch_id)).unwrap();
        // 3 x (html + png + json) + index.html + verify.html
        assert_eq!(docs.len(), 11);

        let raw = store
            .list(&format!("certificates/{}", report.batch_id))
            .unwrap();
        assert_eq!(raw.len(), 3);

        assert!(store.exists(&format!("{}.zip", report.batch_id)).unwrap());
    }

    #[test]
    fn empty_name_rows_are_still_generated() {
        let store = MemoryStore::new();
        // The middle row's name cell is empty but the row is valid.
        let report = run(&store, "name,team\nAda,Analytical\n,Navy\nLin,Compilers\n");
        assert_eq!(report.total_certificates, 3);
        assert!(report.failed_rows.is_empty());
    }

    #[test]
    fn identifiers_are_never_reused_across_runs() {
        let store = MemoryStore::new();
        let csv = "name\nAda\nGrace\n";
        let first = run(&store, csv);
        let second = run(&store, csv);

        let ids: HashSet<String> = first
            .certificates
            .iter()
            .chain(second.certificates.iter())
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids.len(), 4, "ids must be disjoint across runs");
        assert_ne!(first.batch_id, second.batch_id);
    }

    #[test]
    fn preview_is_capped_at_five() {
        let store = MemoryStore::new();
        let mut csv = String::from("name\n");
        for i in 0..9 {
            csv.push_str(&format!("person {i}\n"));
        }
        let report = run(&store, &csv);
        assert_eq!(report.total_certificates, 9);
        assert_eq!(report.certificates.len(), 5);
    }

    #[test]
    fn sidecar_round_trips_through_serde() {
        let store = MemoryStore::new();
        let report = run(&store, "name\nAda\n");
        let id = &report.certificates[0].id;

        let bytes = store
            .get(&format!("docs/{}/{id}.json", report.batch_id))
            .unwrap();
        let record: CertificateRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(record.id, *id);
        assert_eq!(record.name, "Ada");
        assert_eq!(record.event, "RustConf 2026");
        assert_eq!(record.date, "2026-08-07");
    }

    #[test]
    fn verification_url_targets_the_pages_site() {
        let store = MemoryStore::new();
        let report = run(&store, "name\nAda\n");
        assert_eq!(report.github_base_url, "https://octocat.github.io/certs");

        let id = &report.certificates[0].id;
        let html = store
            .get(&format!("docs/{}/{id}.html", report.batch_id))
            .unwrap();
        assert!(String::from_utf8(html).unwrap().contains(id));
    }

    #[test]
    fn github_identity_is_validated() {
        assert!(validate_github_identity("octocat", "certs").is_ok());
        assert!(validate_github_identity("octo.cat-2", "my_repo").is_ok());
        assert!(validate_github_identity("bad/../name", "certs").is_err());
        assert!(validate_github_identity("octocat", "evil/repo?x=1").is_err());
        assert!(validate_github_identity("", "certs").is_err());
    }

    #[actix_web::test]
    async fn missing_column_fails_before_any_write() {
        let uploads = MemoryStore::new();
        uploads.put("templates/cert.png", &template_png()).unwrap();
        uploads.put("excel/list.csv", b"name\nAda\n").unwrap();

        let state = AppState {
            uploads: Arc::new(uploads),
            output: Arc::new(MemoryStore::new()),
            fonts: Arc::new(FontLibrary::Builtin),
        };

        let mut req = request();
        req.name_column = "full_name".into();
        let err = run_batch(&state, req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(state.output.list("docs").unwrap().is_empty());
        assert!(state.output.list("certificates").unwrap().is_empty());
    }

    #[actix_web::test]
    async fn missing_template_is_not_found() {
        let uploads = MemoryStore::new();
        uploads.put("excel/list.csv", b"name\nAda\n").unwrap();
        let state = AppState {
            uploads: Arc::new(uploads),
            output: Arc::new(MemoryStore::new()),
            fonts: Arc::new(FontLibrary::Builtin),
        };

        let err = run_batch(&state, request()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_web::test]
    async fn undecodable_template_reports_an_image_error() {
        let uploads = MemoryStore::new();
        uploads.put("templates/cert.png", b"not an image").unwrap();
        uploads.put("excel/list.csv", b"name\nAda\n").unwrap();
        let state = AppState {
            uploads: Arc::new(uploads),
            output: Arc::new(MemoryStore::new()),
            fonts: Arc::new(FontLibrary::Builtin),
        };

        let err = run_batch(&state, request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Image(_)));
    }
}
