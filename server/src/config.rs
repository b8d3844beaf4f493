//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte; Rufzeichen und Passwort des Moduls muessen aber gesetzt
//! werden, sonst scheitert die Pruefung beim Start.

use std::net::{IpAddr, Ipv4Addr};

use funklink_core::{NodeId, StationData, StationListe};
use funklink_qso::ModulEinstellungen;
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Einstellungen des QSO-Moduls
    pub modul: ModulEinstellungen,
    /// Statisches Verzeichnis
    pub verzeichnis: VerzeichnisEinstellungen,
    /// Simulierte Kollaborateure
    pub simulation: SimulationsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Statisches Verzeichnis statt Verzeichnisserver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerzeichnisEinstellungen {
    /// Anmeldung gelingt (sonst bleibt die Station offline)
    pub erreichbar: bool,
    /// Nachricht des Verzeichnisservers
    pub nachricht: String,
    /// Eintraege der Stationsliste
    pub stationen: Vec<StationEintrag>,
}

impl Default for VerzeichnisEinstellungen {
    fn default() -> Self {
        Self {
            erreichbar: true,
            nachricht: String::new(),
            stationen: vec![],
        }
    }
}

/// Ein Eintrag der Stationsliste
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationEintrag {
    pub rufzeichen: String,
    pub id: u32,
    #[serde(default = "unbestimmte_adresse")]
    pub ip: IpAddr,
    #[serde(default)]
    pub beschreibung: String,
}

fn unbestimmte_adresse() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

impl StationEintrag {
    pub fn station(&self) -> StationData {
        let mut station = StationData::neu(&self.rufzeichen, NodeId(self.id), self.ip);
        station.beschreibung = self.beschreibung.clone();
        station
    }
}

/// Verhalten der simulierten Kollaborateure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationsEinstellungen {
    /// Dauer der Ansage vor einer ausgehenden Verbindung in Millisekunden
    pub ansage_ms: u64,
}

impl Default for SimulationsEinstellungen {
    fn default() -> Self {
        Self { ansage_ms: 1500 }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Stationsliste fuer das statische Verzeichnis
    pub fn stationsliste(&self) -> StationListe {
        StationListe::neu(
            self.verzeichnis
                .stationen
                .iter()
                .map(StationEintrag::station)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BEISPIEL: &str = r#"
        [modul]
        rufzeichen = "SM0ME-L"
        passwort = "geheim"
        standort = "Stockholm"
        max_verbindungen = 4
        max_qsos = 2

        [verzeichnis]
        nachricht = "Willkommen"

        [[verzeichnis.stationen]]
        rufzeichen = "SM0SVX"
        id = 2001
        ip = "10.0.0.1"

        [[verzeichnis.stationen]]
        rufzeichen = "*ECHOTEST*"
        id = 9999
        ip = "10.0.0.2"
        beschreibung = "Echo"
    "#;

    #[test]
    fn standard_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.modul.max_verbindungen, 1);
        assert!(cfg.verzeichnis.erreichbar);
        assert_eq!(cfg.simulation.ansage_ms, 1500);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn config_aus_toml_string() {
        let cfg: ServerConfig = toml::from_str(BEISPIEL).unwrap();
        assert_eq!(cfg.modul.rufzeichen, "SM0ME-L");
        assert_eq!(cfg.modul.max_qsos, 2);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.modul.cbc_timeout_sek, 60);
        assert_eq!(cfg.logging.format, "text");

        let liste = cfg.stationsliste();
        assert_eq!(liste.anzahl(), 2);
        let echo = liste.nach_id(NodeId(9999)).unwrap();
        assert_eq!(echo.rufzeichen, "*ECHOTEST*");
        assert_eq!(echo.beschreibung, "Echo");
    }

    #[test]
    fn station_ohne_adresse() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            [[verzeichnis.stationen]]
            rufzeichen = "DL1ABC"
            id = 101
        "#,
        )
        .unwrap();
        assert!(cfg.verzeichnis.stationen[0].ip.is_unspecified());
    }

    #[test]
    fn laden_aus_datei() {
        let mut datei = tempfile::NamedTempFile::new().unwrap();
        datei.write_all(BEISPIEL.as_bytes()).unwrap();

        let cfg = ServerConfig::laden(datei.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.verzeichnis.nachricht, "Willkommen");
        assert!(cfg.modul.validieren().is_ok());
    }

    #[test]
    fn fehlende_datei_liefert_standardwerte() {
        let verzeichnis = tempfile::tempdir().unwrap();
        let pfad = verzeichnis.path().join("gibt-es-nicht.toml");

        let cfg = ServerConfig::laden(pfad.to_str().unwrap()).unwrap();
        assert!(cfg.verzeichnis.stationen.is_empty());
    }

    #[test]
    fn kaputte_datei_ist_ein_fehler() {
        let mut datei = tempfile::NamedTempFile::new().unwrap();
        datei.write_all(b"[modul\nrufzeichen = ").unwrap();

        let fehler = ServerConfig::laden(datei.path().to_str().unwrap()).unwrap_err();
        assert!(fehler.to_string().contains("Konfigurationsfehler"));
    }
}
