//! funklink-server – Bibliotheks-Root
//!
//! Baut den QSO-Orchestrator mit simulierten Kollaborateuren auf und
//! verbindet ihn mit der Bedienkonsole auf stdin.

pub mod config;
pub mod konsole;
pub mod sim;

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use anyhow::Result;
use config::ServerConfig;
use funklink_core::{Eingang, ModulEvent, QsoEreignis, StationListe};
use funklink_qso::{ModulKontext, QsoOrchestrator};
use konsole::Konsolenbefehl;
use sim::{Gegenstellen, KanalSenke, SimFabrik, SimKanal, StatischesVerzeichnis};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Haelt den Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

/// Laufender Orchestrator samt Zugriffen fuer Konsole und Tests
pub struct Laufzeit {
    pub eingang: mpsc::UnboundedSender<Eingang>,
    pub gegenstellen: Gegenstellen,
    pub stationen: StationListe,
    shutdown: watch::Sender<bool>,
    orchestrator: JoinHandle<()>,
}

impl Laufzeit {
    /// Stoppt den Orchestrator und wartet auf sein Ende
    pub async fn beenden(self) -> Result<()> {
        // Kein Empfaenger mehr heisst: Orchestrator ist schon beendet
        let _ = self.shutdown.send(true);
        self.orchestrator.await?;
        Ok(())
    }
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Prueft die Konfiguration und startet Orchestrator und Hilfstasks
    pub fn aufbauen(&self) -> Result<Laufzeit> {
        let konfig = self.config.modul.validieren()?;
        let stationen = self.config.stationsliste();
        let gegenstellen = Gegenstellen::default();

        let (rueck_tx, rueck_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let kontext = ModulKontext::neu(
            Box::new(StatischesVerzeichnis::neu(
                &self.config.modul.verzeichnis_server,
                stationen.clone(),
                self.config.verzeichnis.erreichbar,
                &self.config.verzeichnis.nachricht,
                rueck_tx,
            )),
            Box::new(SimKanal::default()),
            Box::new(KanalSenke::neu(event_tx)),
            Box::new(SimFabrik::neu(gegenstellen.clone())),
        );
        let (orchestrator, rx) = QsoOrchestrator::neu(konfig, kontext);
        let eingang = orchestrator.eingang_sender();
        let (shutdown, shutdown_rx) = watch::channel(false);

        tokio::spawn(weiterleiten(rueck_rx, eingang.clone()));
        tokio::spawn(ereignisse_verarbeiten(
            event_rx,
            eingang.clone(),
            Duration::from_millis(self.config.simulation.ansage_ms),
        ));
        let orchestrator = tokio::spawn(orchestrator.laufen(rx, shutdown_rx));

        Ok(Laufzeit {
            eingang,
            gegenstellen,
            stationen,
            shutdown,
            orchestrator,
        })
    }

    /// Laeuft bis zum Shutdown-Signal (Ctrl-C)
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            rufzeichen = %self.config.modul.rufzeichen,
            stationen = self.config.verzeichnis.stationen.len(),
            "Server startet"
        );

        let laufzeit = self.aufbauen()?;
        let konsole = tokio::spawn(konsole_lesen(
            laufzeit.eingang.clone(),
            laufzeit.stationen.clone(),
            laufzeit.gegenstellen.clone(),
        ));

        tracing::info!("Server laeuft. Befehle auf stdin, Ctrl-C beendet");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        konsole.abort();
        laufzeit.beenden().await
    }
}

/// Reicht Rueckmeldungen der Kollaborateure an den Orchestrator weiter
async fn weiterleiten(mut rx: mpsc::UnboundedReceiver<Eingang>, tx: mpsc::UnboundedSender<Eingang>) {
    while let Some(eingang) = rx.recv().await {
        if tx.send(eingang).is_err() {
            break;
        }
    }
}

/// Skript-Ebene: loggt Ereignisse und spielt Ansagen vor ausgehenden Verbindungen
async fn ereignisse_verarbeiten(
    mut rx: mpsc::UnboundedReceiver<ModulEvent>,
    tx: mpsc::UnboundedSender<Eingang>,
    ansage: Duration,
) {
    while let Some(event) = rx.recv().await {
        tracing::info!(event = %event, "Modul-Ereignis");
        if matches!(event, ModulEvent::ConnectingTo(_)) {
            let tx = tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(ansage).await;
                let _ = tx.send(Eingang::AnsagenAbgespielt);
            });
        }
    }
}

async fn konsole_lesen(
    tx: mpsc::UnboundedSender<Eingang>,
    stationen: StationListe,
    gegenstellen: Gegenstellen,
) {
    let mut zeilen = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match zeilen.next_line().await {
            Ok(Some(zeile)) if zeile.trim().is_empty() => {}
            Ok(Some(zeile)) => match konsole::zeile_parsen(&zeile) {
                Ok(befehl) => ausfuehren(befehl, &tx, &stationen, &gegenstellen),
                Err(e) => tracing::warn!(fehler = %e, "Konsolenbefehl ungueltig"),
            },
            Ok(None) => {
                tracing::debug!("stdin geschlossen, Konsole beendet");
                break;
            }
            Err(e) => {
                tracing::warn!(fehler = %e, "stdin nicht lesbar, Konsole beendet");
                break;
            }
        }
    }
}

/// Fuehrt einen Konsolenbefehl aus
///
/// Befehle fuer Gegenstationen laufen ueber deren Ereignis-Sender, alles
/// andere direkt in den Eingangskanal.
pub fn ausfuehren(
    befehl: Konsolenbefehl,
    tx: &mpsc::UnboundedSender<Eingang>,
    stationen: &StationListe,
    gegenstellen: &Gegenstellen,
) {
    let eingang = match befehl {
        Konsolenbefehl::Dtmf(cmd) => Eingang::Befehl(cmd),
        Konsolenbefehl::Eingehend {
            rufzeichen,
            name,
            adresse,
        } => {
            let adresse = adresse
                .or_else(|| stationen.nach_rufzeichen(&rufzeichen).map(|s| s.ip))
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
            Eingang::EingehendeVerbindung {
                adresse,
                rufzeichen,
                name,
            }
        }
        Konsolenbefehl::Squelch(offen) => Eingang::Squelch(offen),
        Konsolenbefehl::Sendet { rufzeichen, an } => {
            gegenstelle_meldet(gegenstellen, &rufzeichen, &[QsoEreignis::Empfang(an)]);
            return;
        }
        Konsolenbefehl::Chat { rufzeichen, text } => {
            gegenstelle_meldet(gegenstellen, &rufzeichen, &[QsoEreignis::Chat(text)]);
            return;
        }
        Konsolenbefehl::Trennt { rufzeichen } => {
            let gegenstelle = gegenstellen.lock().remove(&rufzeichen);
            match gegenstelle {
                Some(gegenstelle) => {
                    gegenstelle.beenden();
                }
                None => tracing::warn!(rufzeichen = %rufzeichen, "Keine Verbindung mit dieser Station"),
            }
            return;
        }
        Konsolenbefehl::StatusBericht => Eingang::StatusBericht,
        Konsolenbefehl::Aktiviert => Eingang::Aktiviert,
        Konsolenbefehl::Deaktiviert => Eingang::Deaktiviert,
    };

    if tx.send(eingang).is_err() {
        tracing::warn!("Orchestrator laeuft nicht mehr");
    }
}

fn gegenstelle_meldet(gegenstellen: &Gegenstellen, rufzeichen: &str, ereignisse: &[QsoEreignis]) {
    let Some(gegenstelle) = gegenstellen.lock().get(rufzeichen).cloned() else {
        tracing::warn!(rufzeichen, "Keine Verbindung mit dieser Station");
        return;
    };
    for ereignis in ereignisse {
        gegenstelle.melden(ereignis.clone());
    }
}
