//! TLS material for the secure listener.
//!
//! # Design Decisions
//! - Certificate and key are checked before rustls parses them, so a missing
//!   file fails startup with the offending path rather than a PEM error

use std::fmt;
use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

#[derive(Debug, Clone, Copy)]
enum Material {
    Certificate,
    PrivateKey,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Material::Certificate => "certificate",
            Material::PrivateKey => "private key",
        })
    }
}

async fn require_file(material: Material, path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("TLS {material} path {} is not a file", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("TLS {material} not found at {}", path.display()),
        )),
        Err(e) => Err(e),
    }
}

/// Load the PEM certificate chain and key named by `config`.
pub async fn load_tls_config(config: &TlsConfig) -> io::Result<RustlsConfig> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    require_file(Material::Certificate, cert_path).await?;
    require_file(Material::PrivateKey, key_path).await?;

    tracing::debug!(cert = %cert_path.display(), key = %key_path.display(), "Loading TLS material");
    RustlsConfig::from_pem_file(cert_path, key_path).await
}
