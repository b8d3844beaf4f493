//! Fehlertypen fuer die QSO-Orchestrierung
//!
//! Nur Konfigurationsfehler werden als Fehlerwert gemeldet. Abgelehnte
//! Verbindungen, belegter Kanal und Verzeichnisausfaelle sind erwartete
//! Ablaeufe und werden geloggt bzw. als `ModulEvent` gemeldet.

use thiserror::Error;

/// Fehlertyp fuer die QSO-Orchestrierung
#[derive(Debug, Error)]
pub enum QsoError {
    /// Zugangsregel laesst sich nicht kompilieren
    #[error("Syntaxfehler in Regel {regel}: {grund}")]
    UngueltigesMuster { regel: &'static str, grund: String },

    /// Netzangabe (ALLOW_IP) ungueltig
    #[error("Ungueltige Netzangabe: {0}")]
    UngueltigesNetz(String),

    /// Sonstiger Konfigurationsfehler
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),
}

impl QsoError {
    /// Erstellt einen Konfigurationsfehler
    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }
}

/// Result-Typ fuer die QSO-Orchestrierung
pub type QsoResult<T> = Result<T, QsoError>;
