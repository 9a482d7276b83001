//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

/// Load the listener's certificate and key. ALPN advertises `h2`, which
/// browsers require before they accept pushes.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    for (kind, path) in [("Certificate", &tls.cert_path), ("Private key", &tls.key_path)] {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{kind} file not found: {}", path.display()),
            ));
        }
    }

    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await
}
