//! Batch certificate generation.
//!
//! One route, `POST /generate/certificate`, drives the whole pipeline:
//! resolve the uploaded assets, iterate the dataset rows, compose one
//! certificate image per row, emit the static verification site and bundle
//! it into a downloadable archive.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod archive;
mod compose;
mod site;
mod start;

const API_PATH: &str = "/generate";

/// Configures and returns the Actix scope for generation routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/certificate", post().to(start::process))
}
