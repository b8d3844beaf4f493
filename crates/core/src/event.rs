//! Modul-Ereignisse und Ereignis-Senke
//!
//! Die Orchestrierung meldet alles, was der Benutzer am Funkgeraet hoeren
//! soll, als textuelles Ereignis an die Skript-Ebene. Die Namen und das
//! Argumentformat sind stabil, da die Skripte sie woertlich auswerten.
//! Listen werden im Tcl-Format `[list A B C]` ausgegeben.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Alle Ereignisse, die das Modul an die Skript-Ebene meldet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulEvent {
    // --- Verbindungsaufbau ---
    /// Ausgehende Verbindung wird aufgebaut
    ConnectingTo(String),
    /// Zu diesem Rufzeichen besteht bereits eine Verbindung
    AlreadyConnectedTo(String),
    /// Verbindung zum eigenen Rufzeichen verweigert
    SelfConnect,
    /// Knoten-ID auch nach Verzeichnis-Aktualisierung unbekannt
    StationIdNotFound(NodeId),
    /// Verzeichnisfehler waehrend eine Knoten-ID ausstand
    LookupFailed(NodeId),
    /// Verzeichnisdienst offline oder Status unbekannt
    DirectoryServerOffline,
    /// Keine weiteren Verbindungen erlaubt
    NoMoreConnectionsAllowed,
    /// Interner Fehler beim Erstellen einer Verbindung
    InternalError,

    // --- Connect by Call ---
    /// Befehl zu kurz
    CbcTooShortCmd(String),
    /// Kein Treffer fuer den Code
    CbcNoMatch(String),
    /// Mehr als neun Treffer
    CbcTooManyMatches,
    /// Nummerierte Kandidatenliste
    CbcList(Vec<String>),
    /// Auswahl ausserhalb der Liste
    CbcIndexOutOfRange(u32),
    /// Auswahl abgebrochen
    CbcAborted,
    /// Keine Auswahl innerhalb der Frist
    CbcTimeout,

    // --- Kommandos ---
    /// Kommando mit ungueltigen Argumenten
    CommandFailed(String),
    /// Unbekanntes Kommando
    UnknownCommand(String),
    /// Hilfetext abspielen
    PlayHelp,
    /// Nur-Hoeren-Modus umgeschaltet (alt, neu)
    ListenOnly { alt: bool, neu: bool },
    /// Liste der verbundenen Stationen
    ListConnectedStations(Vec<String>),
    /// Eigene Knoten-ID ansagen (0 = unbekannt)
    PlayNodeId(u32),
    /// Statusbericht mit Anzahl verbundener Stationen
    StatusReport(usize),
}

impl ModulEvent {
    /// Gibt den Ereignis-Namen zurueck (ohne Argumente)
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConnectingTo(_) => "connecting_to",
            Self::AlreadyConnectedTo(_) => "already_connected_to",
            Self::SelfConnect => "self_connect",
            Self::StationIdNotFound(_) => "station_id_not_found",
            Self::LookupFailed(_) => "lookup_failed",
            Self::DirectoryServerOffline => "directory_server_offline",
            Self::NoMoreConnectionsAllowed => "no_more_connections_allowed",
            Self::InternalError => "internal_error",
            Self::CbcTooShortCmd(_) => "cbc_too_short_cmd",
            Self::CbcNoMatch(_) => "cbc_no_match",
            Self::CbcTooManyMatches => "cbc_too_many_matches",
            Self::CbcList(_) => "cbc_list",
            Self::CbcIndexOutOfRange(_) => "cbc_index_out_of_range",
            Self::CbcAborted => "cbc_aborted",
            Self::CbcTimeout => "cbc_timeout",
            Self::CommandFailed(_) => "command_failed",
            Self::UnknownCommand(_) => "unknown_command",
            Self::PlayHelp => "play_help",
            Self::ListenOnly { .. } => "listen_only",
            Self::ListConnectedStations(_) => "list_connected_stations",
            Self::PlayNodeId(_) => "play_node_id",
            Self::StatusReport(_) => "status_report",
        }
    }
}

/// Formatiert eine Rufzeichenliste als Tcl-Liste
fn tcl_liste(f: &mut std::fmt::Formatter<'_>, eintraege: &[String]) -> std::fmt::Result {
    write!(f, "[list")?;
    for eintrag in eintraege {
        write!(f, " {eintrag}")?;
    }
    write!(f, "]")
}

impl std::fmt::Display for ModulEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name();
        match self {
            Self::ConnectingTo(call)
            | Self::AlreadyConnectedTo(call)
            | Self::CbcTooShortCmd(call)
            | Self::CbcNoMatch(call)
            | Self::CommandFailed(call)
            | Self::UnknownCommand(call) => write!(f, "{name} {call}"),
            Self::StationIdNotFound(id) | Self::LookupFailed(id) => write!(f, "{name} {id}"),
            Self::CbcIndexOutOfRange(idx) => write!(f, "{name} {idx}"),
            Self::PlayNodeId(id) => write!(f, "{name} {id}"),
            Self::StatusReport(anzahl) => write!(f, "{name} {anzahl}"),
            Self::ListenOnly { alt, neu } => {
                write!(f, "{name} {} {}", u8::from(*alt), u8::from(*neu))
            }
            Self::CbcList(calls) | Self::ListConnectedStations(calls) => {
                write!(f, "{name} ")?;
                tcl_liste(f, calls)
            }
            Self::SelfConnect
            | Self::DirectoryServerOffline
            | Self::NoMoreConnectionsAllowed
            | Self::InternalError
            | Self::CbcTooManyMatches
            | Self::CbcAborted
            | Self::CbcTimeout
            | Self::PlayHelp => write!(f, "{name}"),
        }
    }
}

/// Ereignis-Senke der Skript-Ebene
///
/// Fire-and-forget: Implementierungen duerfen den Aufrufer nie scheitern
/// lassen. Fehler werden dort geloggt und verworfen.
pub trait EventSink: Send {
    /// Meldet ein Ereignis
    fn senden(&self, event: &ModulEvent);

    /// Setzt eine Ereignis-Variable (z.B. `EchoLink::num_connected_stations`)
    fn variable_setzen(&self, name: &str, wert: &str);
}
