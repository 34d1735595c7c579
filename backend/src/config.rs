use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved once at startup from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root of the upload store (`templates/`, `excel/` live beneath it).
    pub uploads_dir: PathBuf,
    /// Root of the output store (`certificates/`, `docs/`, batch archives).
    pub output_dir: PathBuf,
    /// Directory searched first when resolving a certificate font.
    pub fonts_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("CERTGEN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("CERTGEN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let uploads_dir = env::var("CERTGEN_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        let output_dir = env::var("CERTGEN_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));
        let fonts_dir = env::var("CERTGEN_FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("fonts"));

        Config {
            host,
            port,
            uploads_dir,
            output_dir,
            fonts_dir,
        }
    }
}
