mod config;
mod error;
mod fonts;
mod services;
mod state;
mod storage;

use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use env_logger::Env;
use log::info;

use crate::config::Config;
use crate::fonts::FontLibrary;
use crate::state::AppState;
use crate::storage::DiskStore;

async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Certificate generator API is running"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let uploads = DiskStore::new(&config.uploads_dir)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let output =
        DiskStore::new(&config.output_dir).map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = AppState {
        uploads: Arc::new(uploads),
        output: Arc::new(output),
        fonts: Arc::new(FontLibrary::load(&config.fonts_dir)),
    };

    // Local preview of published batches before they are pushed to Pages.
    let docs_root = config.output_dir.join("docs");
    std::fs::create_dir_all(&docs_root)?;

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(state.clone()))
            .service(services::uploads::configure_routes())
            .service(services::generate::configure_routes())
            .service(actix_files::Files::new("/docs", docs_root.clone()))
            .service(services::certificates::configure_routes())
            .route("/", web::get().to(liveness))
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
