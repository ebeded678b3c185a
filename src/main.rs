mod error;
mod form_verification;
mod lookup;
mod preferences;
mod routes;
mod whois;

use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;
use tracing::{error, info, warn};

use crate::{
    error::StartupError,
    preferences::Preferences,
    routes::{router, AppState},
    whois::WhoisClient,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(%err, "shutting down");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let prefs = Preferences::from_env()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_level(true)
        .with_max_level(prefs.log_level())
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("A tracing subscriber was already installed");
    }

    if prefs.whois_api_key().is_empty() {
        warn!("No WHOIS API key configured; lookups will be rejected by the provider");
    }

    let client = WhoisClient::new(prefs.whois_api_url(), prefs.whois_api_key())?;
    info!(endpoint = client.endpoint(), "WHOIS provider configured");

    let app = router(AppState::new(client));
    let listen = format!("{}:{}", prefs.http_ip(), prefs.port());
    let addr: SocketAddr = listen
        .parse()
        .map_err(|_| StartupError::ListenAddr(listen.clone()))?;

    match (prefs.https_cert_path(), prefs.https_key_path()) {
        (Some(cert), Some(key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("Backend listening on https://{addr}");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Backend listening on http://{addr}");
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
