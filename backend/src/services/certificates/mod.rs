//! Read paths over generated batches: verification lookup and archive
//! download. Both parse the URL identifier as a UUID before any storage key
//! is built, so arbitrary strings never reach the filesystem.

use actix_web::web::{get, scope};
use actix_web::Scope;

mod download;
mod verify;

/// Configures and returns the Actix scope for certificate read routes.
pub fn configure_routes() -> Scope {
    scope("")
        .route("/download/{batch_id}", get().to(download::process))
        .route("/verify/{cert_id}", get().to(verify::process))
}
