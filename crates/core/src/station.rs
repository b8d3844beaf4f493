//! Verzeichnisdaten – Stationseintraege und Suche
//!
//! Eine `StationData` beschreibt einen Eintrag im oeffentlichen Verzeichnis:
//! Rufzeichen, Knoten-ID, registrierte IP-Adresse und Praesenzstatus.
//! `StationListe` haelt einen Schnappschuss der Verzeichnisliste und
//! beantwortet die Suchanfragen der Orchestrierung.
//!
//! ## Rufzeichen-Code
//! Fuer die Eingabe per Tastenfeld wird jedes Rufzeichen in eine Ziffernfolge
//! uebersetzt (Telefon-Belegung: ABC=2, DEF=3, ... PQRS=7, TUV=8, WXYZ=9).
//! Ziffern bleiben erhalten, alle anderen Zeichen entfallen.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Maximale Laenge der Stationsbeschreibung im Verzeichnis
pub const MAX_BESCHREIBUNG: usize = 27;

// ---------------------------------------------------------------------------
// StationStatus
// ---------------------------------------------------------------------------

/// Praesenzstatus einer Station bzw. der eigenen Registrierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StationStatus {
    Online,
    Busy,
    Offline,
    #[default]
    Unknown,
}

impl StationStatus {
    /// Online oder Busy – das Verzeichnis ist benutzbar
    pub fn ist_erreichbar(&self) -> bool {
        matches!(self, Self::Online | Self::Busy)
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Online => "ONLINE",
            Self::Busy => "BUSY",
            Self::Offline => "OFFLINE",
            Self::Unknown => "UNKNOWN",
        };
        f.pad(s)
    }
}

// ---------------------------------------------------------------------------
// StationData
// ---------------------------------------------------------------------------

/// Art einer Station, abgeleitet aus dem Rufzeichen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationsTyp {
    /// Simplex-Link (`-L`)
    Link,
    /// Repeater (`-R`)
    Repeater,
    /// Konferenzserver (`*NAME*`)
    Konferenz,
    /// Einzelner Benutzer
    Benutzer,
}

/// Ein Eintrag im Verzeichnis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationData {
    /// Rufzeichen (z.B. "SM0SVX-L")
    pub rufzeichen: String,
    /// Knoten-ID (fehlt bei lokal synthetisierten Eintraegen)
    pub id: Option<NodeId>,
    /// Registrierte IP-Adresse
    pub ip: IpAddr,
    /// Praesenzstatus
    pub status: StationStatus,
    /// Freitext-Beschreibung (Standort)
    pub beschreibung: String,
}

impl StationData {
    /// Erstellt einen Verzeichniseintrag
    pub fn neu(rufzeichen: impl Into<String>, id: NodeId, ip: IpAddr) -> Self {
        Self {
            rufzeichen: rufzeichen.into(),
            id: Some(id),
            ip,
            status: StationStatus::Online,
            beschreibung: String::new(),
        }
    }

    /// Minimaler Eintrag aus einer Verbindung aus einem vertrauenswuerdigen Netz
    pub fn aus_verbindung(rufzeichen: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            rufzeichen: rufzeichen.into(),
            id: None,
            ip,
            status: StationStatus::Unknown,
            beschreibung: String::new(),
        }
    }

    /// Tastenfeld-Code des Rufzeichens
    pub fn code(&self) -> String {
        rufzeichen_code(&self.rufzeichen)
    }

    /// Art der Station
    pub fn typ(&self) -> StationsTyp {
        let call = self.rufzeichen.to_ascii_uppercase();
        if call.starts_with('*') && call.ends_with('*') {
            StationsTyp::Konferenz
        } else if call.ends_with("-L") {
            StationsTyp::Link
        } else if call.ends_with("-R") {
            StationsTyp::Repeater
        } else {
            StationsTyp::Benutzer
        }
    }
}

impl std::fmt::Display for StationData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.id.map(|id| id.wert()).unwrap_or(0);
        write!(
            f,
            "{:<12} {:<7} {:>7} {}",
            self.rufzeichen, self.status, id, self.ip
        )
    }
}

/// Uebersetzt ein Rufzeichen in seinen Tastenfeld-Code
pub fn rufzeichen_code(rufzeichen: &str) -> String {
    rufzeichen
        .chars()
        .filter_map(|c| {
            let c = c.to_ascii_uppercase();
            match c {
                '0'..='9' => Some(c),
                'A'..='C' => Some('2'),
                'D'..='F' => Some('3'),
                'G'..='I' => Some('4'),
                'J'..='L' => Some('5'),
                'M'..='O' => Some('6'),
                'P'..='S' => Some('7'),
                'T'..='V' => Some('8'),
                'W'..='Z' => Some('9'),
                _ => None,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// StationListe
// ---------------------------------------------------------------------------

/// Schnappschuss der Verzeichnisliste
#[derive(Debug, Clone, Default)]
pub struct StationListe {
    stationen: Vec<StationData>,
}

impl StationListe {
    /// Erstellt eine Liste, sortiert nach Rufzeichen
    pub fn neu(mut stationen: Vec<StationData>) -> Self {
        stationen.sort_by(|a, b| a.rufzeichen.cmp(&b.rufzeichen));
        Self { stationen }
    }

    /// Ersetzt den Inhalt (nach einer Aktualisierung)
    pub fn ersetzen(&mut self, stationen: Vec<StationData>) {
        *self = Self::neu(stationen);
    }

    /// Sucht eine Station anhand ihrer Knoten-ID
    pub fn nach_id(&self, id: NodeId) -> Option<&StationData> {
        self.stationen.iter().find(|s| s.id == Some(id))
    }

    /// Sucht eine Station anhand ihres Rufzeichens (Gross-/Kleinschreibung egal)
    pub fn nach_rufzeichen(&self, rufzeichen: &str) -> Option<&StationData> {
        self.stationen
            .iter()
            .find(|s| s.rufzeichen.eq_ignore_ascii_case(rufzeichen))
    }

    /// Sucht alle Stationen deren Code passt
    ///
    /// `exakt = false` bedeutet Praefix-Suche.
    pub fn nach_code(&self, code: &str, exakt: bool) -> Vec<StationData> {
        self.stationen
            .iter()
            .filter(|s| {
                let stn_code = s.code();
                if exakt {
                    stn_code == code
                } else {
                    stn_code.starts_with(code)
                }
            })
            .cloned()
            .collect()
    }

    /// Alle Stationen eines Typs
    pub fn nach_typ(&self, typ: StationsTyp) -> Vec<StationData> {
        self.stationen
            .iter()
            .filter(|s| s.typ() == typ)
            .cloned()
            .collect()
    }

    /// Anzahl der Eintraege
    pub fn anzahl(&self) -> usize {
        self.stationen.len()
    }

    /// Prueft ob die Liste leer ist
    pub fn ist_leer(&self) -> bool {
        self.stationen.is_empty()
    }
}
