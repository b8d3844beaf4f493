//! Modul-Konfiguration
//!
//! `ModulEinstellungen` ist der rohe `[modul]`-Abschnitt der
//! Konfigurationsdatei. `validieren` prueft ihn und liefert eine
//! `ModulKonfig` mit kompilierten Regeln und Zeitspannen. Ein Fehler hier
//! bricht den Start ab.

use std::time::Duration;

use funklink_core::station::MAX_BESCHREIBUNG;
use serde::{Deserialize, Serialize};

use crate::error::{QsoError, QsoResult};
use crate::netz::VertrauensNetz;
use crate::policy::AccessPolicy;

/// Platzhalter aus der Beispielkonfiguration
const PLATZHALTER_RUFZEICHEN: &str = "MYCALL-L";
const PLATZHALTER_PASSWORT: &str = "MyPass";

/// Roher `[modul]`-Abschnitt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulEinstellungen {
    /// Modulname, Praefix der Ereignis-Variablen
    pub name: String,
    /// Eigenes Rufzeichen
    pub rufzeichen: String,
    /// Passwort fuer den Verzeichnisdienst
    pub passwort: String,
    /// Standort (Verzeichnis-Beschreibung)
    pub standort: String,
    /// Name des Betreibers fuer die Teilnehmerliste
    pub sysop_name: String,
    /// Info-Text fuer Gegenstationen
    pub beschreibung: String,
    /// Adresse des Verzeichnisservers
    pub verzeichnis_server: String,
    /// Harte Obergrenze fuer Session-Objekte
    pub max_verbindungen: usize,
    /// Weiche Obergrenze fuer gleichzeitige QSOs
    pub max_qsos: usize,
    /// Vertrauenswuerdiges Netz (`addr/praefix`)
    pub allow_ip: Option<String>,
    /// Rufzeichen-Muster: still verwerfen
    pub drop: Option<String>,
    /// Rufzeichen-Muster: mit Hinweis ablehnen
    pub reject: Option<String>,
    /// Rufzeichen-Muster: annehmen
    pub accept: Option<String>,
    /// Frist fuer die Connect-by-Call-Auswahl in Sekunden
    pub cbc_timeout_sek: u64,
    /// Intervall der Verzeichnis-Aktualisierung in Sekunden
    pub verzeichnis_intervall_sek: u64,
}

impl Default for ModulEinstellungen {
    fn default() -> Self {
        Self {
            name: "EchoLink".into(),
            rufzeichen: String::new(),
            passwort: String::new(),
            standort: String::new(),
            sysop_name: String::new(),
            beschreibung: String::new(),
            verzeichnis_server: "servers.echolink.org".into(),
            max_verbindungen: 1,
            max_qsos: 1,
            allow_ip: None,
            drop: None,
            reject: None,
            accept: None,
            cbc_timeout_sek: 60,
            verzeichnis_intervall_sek: 600,
        }
    }
}

/// Gepruefte Konfiguration, wie sie der Orchestrator benutzt
#[derive(Debug, Clone)]
pub struct ModulKonfig {
    pub name: String,
    pub rufzeichen: String,
    pub standort: String,
    pub sysop_name: String,
    pub beschreibung: String,
    pub max_verbindungen: usize,
    pub max_qsos: usize,
    pub policy: AccessPolicy,
    pub vertrauens_netz: Option<VertrauensNetz>,
    pub cbc_frist: Duration,
    pub verzeichnis_intervall: Duration,
}

impl ModulEinstellungen {
    /// Prueft die Einstellungen und kompiliert Regeln und Netz
    pub fn validieren(&self) -> QsoResult<ModulKonfig> {
        if self.rufzeichen.is_empty() || self.rufzeichen == PLATZHALTER_RUFZEICHEN {
            return Err(QsoError::konfiguration(
                "Rufzeichen nicht gesetzt oder noch Platzhalter",
            ));
        }
        if self.passwort.is_empty() || self.passwort == PLATZHALTER_PASSWORT {
            return Err(QsoError::konfiguration(
                "Passwort nicht gesetzt oder noch Platzhalter",
            ));
        }
        if self.max_qsos > self.max_verbindungen {
            return Err(QsoError::konfiguration(format!(
                "max_qsos ({}) darf nicht groesser als max_verbindungen ({}) sein",
                self.max_qsos, self.max_verbindungen
            )));
        }

        let policy = AccessPolicy::neu(
            self.drop.as_deref(),
            self.reject.as_deref(),
            self.accept.as_deref(),
        )?;

        let vertrauens_netz = self
            .allow_ip
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<VertrauensNetz>)
            .transpose()?;

        let mut standort = self.standort.clone();
        if standort.chars().count() > MAX_BESCHREIBUNG {
            tracing::warn!(
                standort = %standort,
                max = MAX_BESCHREIBUNG,
                "Standort zu lang, wird gekuerzt"
            );
            standort = standort.chars().take(MAX_BESCHREIBUNG).collect();
        }

        Ok(ModulKonfig {
            name: self.name.clone(),
            rufzeichen: self.rufzeichen.clone(),
            standort,
            sysop_name: self.sysop_name.clone(),
            beschreibung: self.beschreibung.clone(),
            max_verbindungen: self.max_verbindungen,
            max_qsos: self.max_qsos,
            policy,
            vertrauens_netz,
            cbc_frist: Duration::from_secs(self.cbc_timeout_sek),
            verzeichnis_intervall: Duration::from_secs(self.verzeichnis_intervall_sek),
        })
    }
}
