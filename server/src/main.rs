//! Funklink Server – Einstiegspunkt
//!
//! Aufruf: `funklink-server [config.toml]`. Ohne Argument gilt
//! `FUNKLINK_CONFIG`, danach `config.toml` im Arbeitsverzeichnis.

use anyhow::Result;
use funklink_server::{
    config::{LoggingEinstellungen, ServerConfig},
    Server,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_pfad = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FUNKLINK_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".into());

    let config = ServerConfig::laden(&config_pfad)?;
    logging_initialisieren(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        rufzeichen = %config.modul.rufzeichen,
        max_qsos = config.modul.max_qsos,
        max_verbindungen = config.modul.max_verbindungen,
        stationen = config.verzeichnis.stationen.len(),
        "Funklink Server wird initialisiert"
    );

    Server::neu(config).starten().await
}

/// Initialisiert tracing-subscriber
///
/// Vorrang beim Filter: `RUST_LOG`, dann `FUNKLINK_LOG_LEVEL`, dann
/// `[logging] level`. `FUNKLINK_LOG_FORMAT` ersetzt `[logging] format`.
fn logging_initialisieren(logging: &LoggingEinstellungen) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = std::env::var("FUNKLINK_LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("FUNKLINK_LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    if format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(false).compact().init();
    }
}
