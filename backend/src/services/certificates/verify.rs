use actix_web::{web, HttpResponse};
use common::model::certificate::CertificateRecord;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::ContentStore;

/// Handler for `GET /verify/{cert_id}`: returns the metadata sidecar written
/// at generation time, verbatim.
pub(crate) async fn process(
    state: web::Data<AppState>,
    cert_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let record = lookup_certificate(state.output.as_ref(), &cert_id.into_inner())?;
    Ok(HttpResponse::Ok().json(record))
}

/// Find the sidecar for `cert_id` across published batches.
///
/// Certificates are looked up without batch context (the QR carries only the
/// id), so the scan walks `docs/{batch}/{id}.json` for every batch.
fn lookup_certificate(
    store: &dyn ContentStore,
    cert_id: &str,
) -> Result<CertificateRecord, ApiError> {
    let id = Uuid::parse_str(cert_id)
        .map_err(|_| ApiError::Validation("certificate id must be a UUID".into()))?;
    let sidecar = format!("{id}.json");

    for key in store.list("docs")? {
        if key.rsplit('/').next() == Some(sidecar.as_str()) {
            let record = serde_json::from_slice(&store.get(&key)?)?;
            return Ok(record);
        }
    }
    Err(ApiError::NotFound("certificate not found or invalid".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn record() -> CertificateRecord {
        CertificateRecord {
            id: "b9c0e2ac-3d54-4f86-9e65-36a41e867dcf".into(),
            name: "Ada Lovelace".into(),
            event: "RustConf 2026".into(),
            date: "2026-08-07".into(),
            issued_at: "2026-08-07T12:00:00+00:00".into(),
        }
    }

    #[test]
    fn lookup_returns_the_stored_fields_verbatim() {
        let store = MemoryStore::new();
        let stored = record();
        store
            .put(
                &format!("docs/batch-1/{}.json", stored.id),
                &serde_json::to_vec(&stored).unwrap(),
            )
            .unwrap();

        let found = lookup_certificate(&store, &stored.id).unwrap();
        assert_eq!(found, stored);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = lookup_certificate(&store, "b9c0e2ac-3d54-4f86-9e65-36a41e867dcf").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn malformed_id_is_rejected_before_lookup() {
        let store = MemoryStore::new();
        for id in ["../../etc/passwd", "not-a-uuid", "", "abc.json"] {
            let err = lookup_certificate(&store, id).unwrap_err();
            assert!(
                matches!(err, ApiError::Validation(_)),
                "id {id:?} should be rejected"
            );
        }
    }
}
