//! Aufzeichnende Test-Kollaborateure fuer die Integrationstests
//!
//! Alle Fakes teilen sich eine `Welt` hinter einem `parking_lot::Mutex`.
//! Der Fake-Transport meldet Zustandswechsel wie ein echter Transport ueber
//! den Eingangskanal: `annehmen`/`verbinden` -> Verbunden,
//! `ablehnen`/`trennen` -> Getrennt und danach Zerstoert.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use bytes::Bytes;
use funklink_core::{
    Eingang, EventSink, FunklinkError, LokalerKanal, ModulEvent, NodeId, QsoEreignis,
    QsoEreignisSender, QsoTransport, QsoZustand, StationData, StationListe, StationStatus,
    StationsTyp, TransportFabrik, Verzeichnis,
};
use funklink_qso::{ModulEinstellungen, ModulKontext, QsoOrchestrator};
use parking_lot::Mutex;
use tokio::sync::mpsc;

pub const EIGENES_RUFZEICHEN: &str = "SM0ME-L";

/// Gemeinsamer, beobachtbarer Zustand aller Fakes
#[derive(Debug, Default)]
pub struct Welt {
    // Ereignis-Senke
    pub ereignisse: Vec<String>,
    pub variablen: HashMap<String, String>,

    // Verzeichnis
    pub stationen: StationListe,
    pub status: StationStatus,
    pub nachricht: String,
    pub aktualisierungen: usize,
    pub beschreibungen: Vec<String>,
    pub registrierungen: usize,

    // Lokaler Kanal
    pub kanal_aktiv: bool,
    pub kanal_belegt: bool,
    pub deaktivierungen: usize,
    pub leerlauf: Option<bool>,
    pub tasten: Vec<bool>,
    pub audio_ausgegeben: usize,

    // Transporte
    pub erstellen_fehlschlagen: bool,
    pub erstellt: Vec<String>,
    pub aufrufe: Vec<(String, String)>,
    pub infos: HashMap<String, Vec<String>>,
    pub chats: HashMap<String, Vec<String>>,
    pub audio_roh: HashMap<String, usize>,
    pub audio: HashMap<String, usize>,
}

pub type GeteilteWelt = Arc<Mutex<Welt>>;

impl Welt {
    /// Transport-Aufrufe fuer ein Rufzeichen
    pub fn aufrufe_von(&self, rufzeichen: &str) -> Vec<String> {
        self.aufrufe
            .iter()
            .filter(|(call, _)| call == rufzeichen)
            .map(|(_, aufruf)| aufruf.clone())
            .collect()
    }

    pub fn anzahl_ereignis(&self, text: &str) -> usize {
        self.ereignisse.iter().filter(|e| *e == text).count()
    }
}

// ---------------------------------------------------------------------------
// Ereignis-Senke
// ---------------------------------------------------------------------------

pub struct FakeSenke(pub GeteilteWelt);

impl EventSink for FakeSenke {
    fn senden(&self, event: &ModulEvent) {
        self.0.lock().ereignisse.push(event.to_string());
    }

    fn variable_setzen(&self, name: &str, wert: &str) {
        self.0
            .lock()
            .variablen
            .insert(name.to_string(), wert.to_string());
    }
}

// ---------------------------------------------------------------------------
// Verzeichnis
// ---------------------------------------------------------------------------

pub struct FakeVerzeichnis(pub GeteilteWelt);

impl Verzeichnis for FakeVerzeichnis {
    fn online_gehen(&mut self) {}

    fn aktualisieren(&mut self) {
        self.0.lock().aktualisierungen += 1;
    }

    fn nach_id(&self, id: NodeId) -> Option<StationData> {
        self.0.lock().stationen.nach_id(id).cloned()
    }

    fn nach_rufzeichen(&self, rufzeichen: &str) -> Option<StationData> {
        self.0.lock().stationen.nach_rufzeichen(rufzeichen).cloned()
    }

    fn nach_code(&self, code: &str, exakt: bool) -> Vec<StationData> {
        self.0.lock().stationen.nach_code(code, exakt)
    }

    fn nach_typ(&self, typ: StationsTyp) -> Vec<StationData> {
        self.0.lock().stationen.nach_typ(typ)
    }

    fn status(&self) -> StationStatus {
        self.0.lock().status
    }

    fn beschreibung_setzen(&mut self, beschreibung: &str) {
        self.0.lock().beschreibungen.push(beschreibung.to_string());
    }

    fn registrierung_aktualisieren(&mut self) {
        self.0.lock().registrierungen += 1;
    }

    fn nachricht(&self) -> String {
        self.0.lock().nachricht.clone()
    }
}

// ---------------------------------------------------------------------------
// Lokaler Kanal
// ---------------------------------------------------------------------------

pub struct FakeKanal(pub GeteilteWelt);

impl LokalerKanal for FakeKanal {
    fn aktivieren(&mut self) -> bool {
        let mut welt = self.0.lock();
        if welt.kanal_belegt {
            return false;
        }
        welt.kanal_aktiv = true;
        true
    }

    fn deaktivieren(&mut self) -> bool {
        let mut welt = self.0.lock();
        welt.kanal_aktiv = false;
        welt.deaktivierungen += 1;
        true
    }

    fn ist_aktiv(&self) -> bool {
        self.0.lock().kanal_aktiv
    }

    fn leerlauf_setzen(&mut self, leerlauf: bool) {
        self.0.lock().leerlauf = Some(leerlauf);
    }

    fn senden(&mut self, tasten: bool) {
        self.0.lock().tasten.push(tasten);
    }

    fn audio_ausgeben(&mut self, _samples: &[f32]) {
        self.0.lock().audio_ausgegeben += 1;
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

pub struct FakeTransport {
    rufzeichen: String,
    sender: QsoEreignisSender,
    welt: GeteilteWelt,
    beendet: bool,
}

impl FakeTransport {
    fn aufzeichnen(&self, aufruf: &str) {
        self.welt
            .lock()
            .aufrufe
            .push((self.rufzeichen.clone(), aufruf.to_string()));
    }

    fn beenden(&mut self) {
        if self.beendet {
            return;
        }
        self.beendet = true;
        self.sender
            .melden(QsoEreignis::Zustand(QsoZustand::Getrennt));
        self.sender.melden(QsoEreignis::Zerstoert);
    }
}

impl QsoTransport for FakeTransport {
    fn annehmen(&mut self) {
        self.aufzeichnen("annehmen");
        self.sender
            .melden(QsoEreignis::Zustand(QsoZustand::Verbunden));
    }

    fn ablehnen(&mut self, mit_hinweis: bool) {
        self.aufzeichnen(&format!("ablehnen({mit_hinweis})"));
        self.beenden();
    }

    fn verbinden(&mut self) {
        self.aufzeichnen("verbinden");
        self.sender
            .melden(QsoEreignis::Zustand(QsoZustand::Verbunden));
    }

    fn trennen(&mut self) {
        self.aufzeichnen("trennen");
        self.beenden();
    }

    fn audio_senden(&mut self, _samples: &[f32]) {
        *self
            .welt
            .lock()
            .audio
            .entry(self.rufzeichen.clone())
            .or_default() += 1;
    }

    fn audio_roh_senden(&mut self, _paket: &Bytes) {
        *self
            .welt
            .lock()
            .audio_roh
            .entry(self.rufzeichen.clone())
            .or_default() += 1;
    }

    fn chat_senden(&mut self, text: &str) {
        self.welt
            .lock()
            .chats
            .entry(self.rufzeichen.clone())
            .or_default()
            .push(text.to_string());
    }

    fn info_senden(&mut self, text: &str) {
        self.welt
            .lock()
            .infos
            .entry(self.rufzeichen.clone())
            .or_default()
            .push(text.to_string());
    }

    fn lokale_info_setzen(&mut self, _text: &str) {}
}

pub struct FakeFabrik(pub GeteilteWelt);

impl TransportFabrik for FakeFabrik {
    fn erstellen(
        &mut self,
        station: &StationData,
        sender: QsoEreignisSender,
    ) -> funklink_core::Result<Box<dyn QsoTransport>> {
        let mut welt = self.0.lock();
        if welt.erstellen_fehlschlagen {
            return Err(FunklinkError::transport("Socket nicht verfuegbar"));
        }
        welt.erstellt.push(station.rufzeichen.clone());
        Ok(Box::new(FakeTransport {
            rufzeichen: station.rufzeichen.clone(),
            sender,
            welt: self.0.clone(),
            beendet: false,
        }))
    }
}

// ---------------------------------------------------------------------------
// Aufbau
// ---------------------------------------------------------------------------

pub fn ip(letztes_oktett: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, letztes_oktett))
}

/// Verzeichniseintrag mit Adresse `10.0.0.<id % 256>`
pub fn station(rufzeichen: &str, id: u32) -> StationData {
    StationData::neu(rufzeichen, NodeId(id), ip((id % 256) as u8))
}

/// Gueltige Einstellungen mit vier QSO-Plaetzen
pub fn einstellungen() -> ModulEinstellungen {
    ModulEinstellungen {
        rufzeichen: EIGENES_RUFZEICHEN.into(),
        passwort: "geheim".into(),
        standort: "Stockholm".into(),
        sysop_name: "Sven".into(),
        max_verbindungen: 4,
        max_qsos: 4,
        ..Default::default()
    }
}

pub struct Testaufbau {
    pub orchestrator: QsoOrchestrator,
    pub rx: mpsc::UnboundedReceiver<Eingang>,
    pub welt: GeteilteWelt,
}

impl Testaufbau {
    /// Baut einen Orchestrator mit Online-Verzeichnis und den gegebenen Stationen
    pub fn neu(einstellungen: ModulEinstellungen, stationen: Vec<StationData>) -> Self {
        let welt: GeteilteWelt = Arc::new(Mutex::new(Welt {
            stationen: StationListe::neu(stationen),
            status: StationStatus::Online,
            ..Default::default()
        }));
        let konfig = einstellungen
            .validieren()
            .expect("Test-Einstellungen muessen gueltig sein");
        let kontext = ModulKontext::neu(
            Box::new(FakeVerzeichnis(welt.clone())),
            Box::new(FakeKanal(welt.clone())),
            Box::new(FakeSenke(welt.clone())),
            Box::new(FakeFabrik(welt.clone())),
        );
        let (mut orchestrator, rx) = QsoOrchestrator::neu(konfig, kontext);
        orchestrator.starten();
        Self {
            orchestrator,
            rx,
            welt,
        }
    }

    /// Verarbeitet alle wartenden Eingaenge
    pub fn pumpen(&mut self) {
        while let Ok(eingang) = self.rx.try_recv() {
            self.orchestrator.verarbeiten(eingang);
        }
    }

    /// Verarbeitet einen Eingang und alles, was daraus folgt
    pub fn eingeben(&mut self, eingang: Eingang) {
        self.orchestrator.verarbeiten(eingang);
        self.pumpen();
    }

    pub fn befehl(&mut self, befehl: &str) {
        self.eingeben(Eingang::Befehl(befehl.to_string()));
    }

    /// Eingehende Verbindung einer Verzeichnis-Station
    pub fn eingehend(&mut self, station: &StationData) {
        self.eingeben(Eingang::EingehendeVerbindung {
            adresse: station.ip,
            rufzeichen: station.rufzeichen.clone(),
            name: format!("Op {}", station.rufzeichen),
        });
    }

    /// Rueckmeldung einer Session, gesucht ueber das Rufzeichen
    pub fn qso_meldet(&mut self, rufzeichen: &str, ereignis: QsoEreignis) {
        let id = self
            .orchestrator
            .registry()
            .finden(|q| q.rufzeichen() == rufzeichen && !q.ist_getrennt())
            .map(|q| q.id())
            .expect("Session muss existieren");
        self.eingeben(Eingang::Qso { id, ereignis });
    }

    pub fn ereignisse(&self) -> Vec<String> {
        self.welt.lock().ereignisse.clone()
    }

    pub fn letztes_ereignis(&self) -> Option<String> {
        self.welt.lock().ereignisse.last().cloned()
    }

    pub fn rufzeichen_in_registry(&self) -> Vec<String> {
        self.orchestrator
            .registry()
            .iter()
            .map(|q| q.rufzeichen().to_string())
            .collect()
    }
}
