//! Bundles a batch's publish directory into a single zip archive.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ApiError;
use crate::storage::ContentStore;

/// Zip every key under `docs/{batch_id}` into `{batch_id}.zip`, entry names
/// relative to the publish directory so the archive unpacks as a ready
/// GitHub Pages tree.
pub(super) fn archive_publish_dir(
    store: &dyn ContentStore,
    batch_id: &str,
) -> Result<(), ApiError> {
    let prefix = format!("docs/{batch_id}");
    let dir = format!("{prefix}/");
    let keys = store.list(&prefix)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for key in &keys {
        let name = key.strip_prefix(&dir).unwrap_or(key);
        let bytes = store.get(key)?;
        writer.start_file(name, options).map_err(zip_err)?;
        writer
            .write_all(&bytes)
            .map_err(|e| ApiError::Internal(format!("zip write failed: {e}")))?;
    }

    let cursor = writer.finish().map_err(zip_err)?;
    store.put(&format!("{batch_id}.zip"), &cursor.into_inner())?;
    Ok(())
}

fn zip_err(e: zip::result::ZipError) -> ApiError {
    ApiError::Internal(format!("zip archive failed: {e}"))
}
