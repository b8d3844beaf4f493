//! Fehlertypen fuer Funklink
//!
//! Zentraler Fehler-Enum fuer die Kollaborateur-Schnittstellen.
//! Das QSO-Crate definiert fuer Konfigurationsfehler einen eigenen Typ.

use thiserror::Error;

/// Globaler Result-Alias fuer Funklink
pub type Result<T> = std::result::Result<T, FunklinkError>;

/// Fehler an den Grenzen zu externen Kollaborateuren
#[derive(Debug, Error)]
pub enum FunklinkError {
    // --- Transport ---
    #[error("QSO-Transport konnte nicht erstellt werden: {0}")]
    Transport(String),

    // --- Verzeichnis ---
    #[error("Verzeichnisdienst nicht erreichbar: {0}")]
    Verzeichnis(String),
}

impl FunklinkError {
    /// Erstellt einen Transportfehler
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Erstellt einen Verzeichnisfehler
    pub fn verzeichnis(msg: impl Into<String>) -> Self {
        Self::Verzeichnis(msg.into())
    }
}
