use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};

#[derive(Clone, Debug, Parser)]
pub struct CertVaultConfig {
    #[clap(
        short,
        long,
        env = "CERTVAULT_BIND_ADDR",
        default_value = "0.0.0.0:5000"
    )]
    pub bind_addr: SocketAddr,

    /// Origin allowed to call the API from a browser.
    #[clap(
        long,
        env = "CERTVAULT_PUBLIC_URL",
        default_value = "http://localhost:5000"
    )]
    pub public_url: String,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    /// Path to the JSON file holding certificate records.
    ///
    /// The file and its parent directory are created on first start.
    #[clap(
        long,
        env = "CERTVAULT_DB_PATH",
        default_value = "./db/certificates.json"
    )]
    pub db_path: PathBuf,

    /// Directory uploaded certificate and key files are written to.
    ///
    /// Each upload gets its own subdirectory, so two uploads with the same
    /// file name do not overwrite each other.
    #[clap(long, env = "CERTVAULT_UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: PathBuf,
}
