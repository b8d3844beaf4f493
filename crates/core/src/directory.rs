//! Verzeichnisdienst-Schnittstelle
//!
//! Das oeffentliche Verzeichnis bildet Rufzeichen und Knoten-IDs auf
//! IP-Adressen und Praesenzstatus ab. Das Wire-Protokoll liegt ausserhalb
//! dieses Projekts; hier ist nur der Vertrag beschrieben.
//!
//! `aktualisieren` ist fire-and-forget: das Ergebnis kommt spaeter als
//! `Eingang::StationslisteAktualisiert` bzw. `Eingang::VerzeichnisFehler`
//! beim Orchestrator an.

use crate::station::{StationData, StationStatus, StationsTyp};
use crate::types::NodeId;

/// Vertrag des Verzeichnisdienstes
pub trait Verzeichnis: Send {
    /// Meldet die eigene Station am Verzeichnis an
    fn online_gehen(&mut self);

    /// Fordert eine neue Stationsliste an (asynchron)
    fn aktualisieren(&mut self);

    /// Sucht eine Station anhand ihrer Knoten-ID
    fn nach_id(&self, id: NodeId) -> Option<StationData>;

    /// Sucht eine Station anhand ihres Rufzeichens
    fn nach_rufzeichen(&self, rufzeichen: &str) -> Option<StationData>;

    /// Sucht Stationen anhand des Tastenfeld-Codes, sortiert nach Rufzeichen
    fn nach_code(&self, code: &str, exakt: bool) -> Vec<StationData>;

    /// Alle Stationen eines Typs (fuer Zufallsverbindungen)
    fn nach_typ(&self, typ: StationsTyp) -> Vec<StationData>;

    /// Aktueller Status der eigenen Registrierung
    fn status(&self) -> StationStatus;

    /// Setzt die Beschreibung der eigenen Station
    fn beschreibung_setzen(&mut self, beschreibung: &str);

    /// Uebertraegt die Registrierung erneut (z.B. nach Beschreibungsaenderung)
    fn registrierung_aktualisieren(&mut self);

    /// Aktuelle Nachricht des Verzeichnisservers
    fn nachricht(&self) -> String;
}
