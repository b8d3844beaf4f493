//! Gemeinsame Identifikationstypen fuer Funklink
//!
//! Newtype-Pattern, damit QSO-Instanzen und Verzeichnis-Knoten nicht
//! verwechselt werden koennen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige ID einer QSO-Instanz (lebt genau so lange wie die Session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QsoId(pub Uuid);

impl QsoId {
    /// Erstellt eine neue zufaellige QsoId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QsoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QsoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qso:{}", self.0)
    }
}

/// Numerische Knoten-ID im oeffentlichen Verzeichnis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Gibt den numerischen Wert zurueck
    pub fn wert(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
