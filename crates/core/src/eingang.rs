//! Eingangs-Nachrichten des Orchestrators
//!
//! Alles, was von aussen auf das Modul einwirkt, kommt als `Eingang` ueber
//! einen einzigen Kanal an und wird strikt nacheinander verarbeitet:
//! Verbindungswuensche, Tastenfeld-Befehle, Squelch, Audio, Verzeichnis-
//! Rueckmeldungen, Session-Rueckmeldungen und abgelaufene Timer.

use crate::station::StationStatus;
use crate::transport::QsoEreignis;
use crate::types::QsoId;
use std::net::IpAddr;

/// Welcher Timer ist abgelaufen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerArt {
    /// Frist fuer die Auswahl aus der Connect-by-Call-Liste
    CallCode,
    /// Periodische Aktualisierung der Verzeichnisliste
    Verzeichnis,
}

/// Eine Nachricht an den Orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum Eingang {
    /// Gegenstation moechte sich verbinden
    EingehendeVerbindung {
        adresse: IpAddr,
        rufzeichen: String,
        name: String,
    },
    /// Tastenfeld-Befehl (ohne abschliessendes `#`)
    Befehl(String),
    /// Squelch des lokalen Empfaengers
    Squelch(bool),
    /// Audio vom lokalen Empfaenger
    EmpfaengerAudio(Vec<f32>),
    /// Alle eingereihten Ansagen wurden abgespielt
    AnsagenAbgespielt,
    /// Modul wurde von der umgebenden Logik aktiviert
    Aktiviert,
    /// Modul wurde von der umgebenden Logik deaktiviert
    Deaktiviert,
    /// Statusbericht angefordert
    StatusBericht,
    /// Registrierungsstatus am Verzeichnis hat sich geaendert
    VerzeichnisStatus(StationStatus),
    /// Neue Stationsliste liegt vor
    StationslisteAktualisiert,
    /// Verzeichnisfehler
    VerzeichnisFehler(String),
    /// Rueckmeldung einer Session
    Qso { id: QsoId, ereignis: QsoEreignis },
    /// Timer abgelaufen
    Timer { art: TimerArt, generation: u64 },
}
