//! Simulierte Kollaborateure fuer den Betrieb ohne Funkgeraet und Netz
//!
//! - `StatischesVerzeichnis`: Stationsliste aus der Konfiguration
//! - `SimKanal`: lokaler Kanal, der nur loggt
//! - `SimFabrik` / `SimTransport`: Gegenstationen, die sofort verbunden sind
//! - `KanalSenke`: reicht Modul-Ereignisse an die Skript-Ebene weiter
//!
//! Rueckmeldungen laufen wie bei echten Kollaborateuren als `Eingang` ueber
//! einen Kanal zum Orchestrator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use funklink_core::{
    Eingang, EventSink, FunklinkError, LokalerKanal, ModulEvent, NodeId, QsoEreignis,
    QsoEreignisSender, QsoTransport, QsoZustand, StationData, StationListe, StationStatus,
    StationsTyp, TransportFabrik, Verzeichnis,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Verzeichnis
// ---------------------------------------------------------------------------

pub struct StatischesVerzeichnis {
    server: String,
    stationen: StationListe,
    erreichbar: bool,
    status: StationStatus,
    nachricht: String,
    beschreibung: String,
    rueckmeldung: mpsc::UnboundedSender<Eingang>,
}

impl StatischesVerzeichnis {
    pub fn neu(
        server: impl Into<String>,
        stationen: StationListe,
        erreichbar: bool,
        nachricht: impl Into<String>,
        rueckmeldung: mpsc::UnboundedSender<Eingang>,
    ) -> Self {
        Self {
            server: server.into(),
            stationen,
            erreichbar,
            status: StationStatus::Unknown,
            nachricht: nachricht.into(),
            beschreibung: String::new(),
            rueckmeldung,
        }
    }

    fn melden(&self, eingang: Eingang) {
        if self.rueckmeldung.send(eingang).is_err() {
            tracing::debug!("Orchestrator laeuft nicht mehr, Rueckmeldung verworfen");
        }
    }
}

impl Verzeichnis for StatischesVerzeichnis {
    fn online_gehen(&mut self) {
        if self.erreichbar {
            self.status = StationStatus::Online;
            tracing::info!(server = %self.server, stationen = self.stationen.anzahl(), "Am Verzeichnis angemeldet");
        } else {
            self.status = StationStatus::Offline;
            let fehler = FunklinkError::verzeichnis(&self.server);
            tracing::warn!(fehler = %fehler, "Anmeldung fehlgeschlagen");
            self.melden(Eingang::VerzeichnisFehler(fehler.to_string()));
        }
        self.melden(Eingang::VerzeichnisStatus(self.status));
    }

    fn aktualisieren(&mut self) {
        if !self.status.ist_erreichbar() {
            self.melden(Eingang::VerzeichnisFehler(
                FunklinkError::verzeichnis(&self.server).to_string(),
            ));
            return;
        }
        tracing::debug!(stationen = self.stationen.anzahl(), "Stationsliste geliefert");
        self.melden(Eingang::StationslisteAktualisiert);
    }

    fn nach_id(&self, id: NodeId) -> Option<StationData> {
        self.stationen.nach_id(id).cloned()
    }

    fn nach_rufzeichen(&self, rufzeichen: &str) -> Option<StationData> {
        self.stationen.nach_rufzeichen(rufzeichen).cloned()
    }

    fn nach_code(&self, code: &str, exakt: bool) -> Vec<StationData> {
        self.stationen.nach_code(code, exakt)
    }

    fn nach_typ(&self, typ: StationsTyp) -> Vec<StationData> {
        self.stationen.nach_typ(typ)
    }

    fn status(&self) -> StationStatus {
        self.status
    }

    fn beschreibung_setzen(&mut self, beschreibung: &str) {
        self.beschreibung = beschreibung.to_string();
    }

    fn registrierung_aktualisieren(&mut self) {
        tracing::info!(beschreibung = %self.beschreibung, "Registrierung aktualisiert");
    }

    fn nachricht(&self) -> String {
        self.nachricht.clone()
    }
}

// ---------------------------------------------------------------------------
// Lokaler Kanal
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SimKanal {
    aktiv: bool,
}

impl LokalerKanal for SimKanal {
    fn aktivieren(&mut self) -> bool {
        if !self.aktiv {
            tracing::info!("Lokaler Kanal aktiviert");
        }
        self.aktiv = true;
        true
    }

    fn deaktivieren(&mut self) -> bool {
        tracing::info!("Lokaler Kanal freigegeben");
        self.aktiv = false;
        true
    }

    fn ist_aktiv(&self) -> bool {
        self.aktiv
    }

    fn leerlauf_setzen(&mut self, leerlauf: bool) {
        tracing::debug!(leerlauf, "Leerlauf");
    }

    fn senden(&mut self, tasten: bool) {
        tracing::info!(tasten, "Sender");
    }

    fn audio_ausgeben(&mut self, samples: &[f32]) {
        tracing::trace!(samples = samples.len(), "Audio auf Sender");
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Rueckkanal einer simulierten Gegenstation
///
/// Transport und Konsole teilen sich das Ende-Flag. Wer zuerst beendet,
/// meldet `Getrennt` und `Zerstoert`, der andere Weg meldet nichts mehr.
#[derive(Clone)]
pub struct Gegenstelle {
    sender: QsoEreignisSender,
    beendet: Arc<AtomicBool>,
}

impl Gegenstelle {
    pub fn neu(sender: QsoEreignisSender) -> Self {
        Self {
            sender,
            beendet: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn melden(&self, ereignis: QsoEreignis) {
        self.sender.melden(ereignis);
    }

    /// Meldet das Ende der Session, hoechstens einmal
    ///
    /// Gibt `false` zurueck wenn die Session schon beendet war.
    pub fn beenden(&self) -> bool {
        if self.beendet.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.sender.melden(QsoEreignis::Zustand(QsoZustand::Getrennt));
        self.sender.melden(QsoEreignis::Zerstoert);
        true
    }

    pub fn ist_beendet(&self) -> bool {
        self.beendet.load(Ordering::SeqCst)
    }
}

/// Laufende Gegenstationen, nach Rufzeichen
///
/// Die Konsole spielt darueber die Rolle der Gegenstationen.
pub type Gegenstellen = Arc<Mutex<HashMap<String, Gegenstelle>>>;

pub struct SimTransport {
    rufzeichen: String,
    gegenstelle: Gegenstelle,
    gegenstellen: Gegenstellen,
}

impl SimTransport {
    /// Entfernt den eigenen Eintrag (nicht den einer neueren Session)
    fn austragen(&self) {
        let mut gegenstellen = self.gegenstellen.lock();
        if gegenstellen
            .get(&self.rufzeichen)
            .is_some_and(|g| Arc::ptr_eq(&g.beendet, &self.gegenstelle.beendet))
        {
            gegenstellen.remove(&self.rufzeichen);
        }
    }

    fn beenden(&mut self) {
        self.austragen();
        if !self.gegenstelle.beenden() {
            tracing::debug!(rufzeichen = %self.rufzeichen, "Session war schon beendet");
        }
    }
}

impl QsoTransport for SimTransport {
    fn annehmen(&mut self) {
        tracing::info!(rufzeichen = %self.rufzeichen, "Verbindung angenommen");
        self.gegenstelle.melden(QsoEreignis::Zustand(QsoZustand::Verbunden));
    }

    fn ablehnen(&mut self, mit_hinweis: bool) {
        tracing::info!(rufzeichen = %self.rufzeichen, mit_hinweis, "Verbindung abgelehnt");
        self.beenden();
    }

    fn verbinden(&mut self) {
        tracing::info!(rufzeichen = %self.rufzeichen, "Verbindung aufgebaut");
        self.gegenstelle.melden(QsoEreignis::Zustand(QsoZustand::Verbunden));
    }

    fn trennen(&mut self) {
        tracing::info!(rufzeichen = %self.rufzeichen, "Verbindung getrennt");
        self.beenden();
    }

    fn audio_senden(&mut self, samples: &[f32]) {
        tracing::trace!(rufzeichen = %self.rufzeichen, samples = samples.len(), "Audio gesendet");
    }

    fn audio_roh_senden(&mut self, paket: &Bytes) {
        tracing::trace!(rufzeichen = %self.rufzeichen, bytes = paket.len(), "Audiopaket weitergeleitet");
    }

    fn chat_senden(&mut self, text: &str) {
        tracing::info!(rufzeichen = %self.rufzeichen, text, "Chat");
    }

    fn info_senden(&mut self, text: &str) {
        tracing::debug!(rufzeichen = %self.rufzeichen, info = text, "Teilnehmerliste gesendet");
    }

    fn lokale_info_setzen(&mut self, _text: &str) {}
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        self.austragen();
    }
}

pub struct SimFabrik {
    gegenstellen: Gegenstellen,
}

impl SimFabrik {
    pub fn neu(gegenstellen: Gegenstellen) -> Self {
        Self { gegenstellen }
    }
}

impl TransportFabrik for SimFabrik {
    fn erstellen(
        &mut self,
        station: &StationData,
        sender: QsoEreignisSender,
    ) -> funklink_core::Result<Box<dyn QsoTransport>> {
        if station.ip.is_unspecified() {
            return Err(FunklinkError::transport(format!(
                "keine Adresse fuer {}",
                station.rufzeichen
            )));
        }
        let gegenstelle = Gegenstelle::neu(sender);
        self.gegenstellen
            .lock()
            .insert(station.rufzeichen.clone(), gegenstelle.clone());
        Ok(Box::new(SimTransport {
            rufzeichen: station.rufzeichen.clone(),
            gegenstelle,
            gegenstellen: self.gegenstellen.clone(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Ereignis-Senke
// ---------------------------------------------------------------------------

/// Reicht Modul-Ereignisse ueber einen Kanal weiter
pub struct KanalSenke {
    tx: mpsc::UnboundedSender<ModulEvent>,
}

impl KanalSenke {
    pub fn neu(tx: mpsc::UnboundedSender<ModulEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for KanalSenke {
    fn senden(&self, event: &ModulEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(event = %event, "Keine Skript-Ebene, Ereignis verworfen");
        }
    }

    fn variable_setzen(&self, name: &str, wert: &str) {
        tracing::debug!(name, wert, "Variable gesetzt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funklink_core::QsoId;
    use std::net::{IpAddr, Ipv4Addr};

    fn station(rufzeichen: &str, letztes_oktett: u8) -> StationData {
        StationData::neu(
            rufzeichen,
            NodeId(100 + letztes_oktett as u32),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, letztes_oktett)),
        )
    }

    #[test]
    fn verzeichnis_meldet_anmeldung() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dir = StatischesVerzeichnis::neu(
            "servers.echolink.org",
            StationListe::neu(vec![station("SM0SVX", 1)]),
            true,
            "",
            tx,
        );

        dir.online_gehen();
        assert_eq!(dir.status(), StationStatus::Online);
        assert_eq!(
            rx.try_recv().unwrap(),
            Eingang::VerzeichnisStatus(StationStatus::Online)
        );

        dir.aktualisieren();
        assert_eq!(rx.try_recv().unwrap(), Eingang::StationslisteAktualisiert);
        assert!(dir.nach_rufzeichen("sm0svx").is_some());
    }

    #[test]
    fn unerreichbares_verzeichnis() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dir = StatischesVerzeichnis::neu("dir.example", StationListe::default(), false, "", tx);

        dir.online_gehen();
        assert!(matches!(rx.try_recv().unwrap(), Eingang::VerzeichnisFehler(_)));
        assert_eq!(
            rx.try_recv().unwrap(),
            Eingang::VerzeichnisStatus(StationStatus::Offline)
        );

        dir.aktualisieren();
        match rx.try_recv().unwrap() {
            Eingang::VerzeichnisFehler(meldung) => assert!(meldung.contains("dir.example")),
            anderes => panic!("Unerwarteter Eingang: {anderes:?}"),
        }
    }

    #[test]
    fn transport_meldet_ende_genau_einmal() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gegenstellen = Gegenstellen::default();
        let mut fabrik = SimFabrik::neu(gegenstellen.clone());
        let id = QsoId::new();

        let mut transport = fabrik
            .erstellen(&station("DL1ABC", 7), QsoEreignisSender::neu(id, tx))
            .unwrap();
        assert!(gegenstellen.lock().contains_key("DL1ABC"));

        transport.trennen();
        transport.trennen();
        assert!(gegenstellen.lock().is_empty());

        let mut meldungen = vec![];
        while let Ok(Eingang::Qso { ereignis, .. }) = rx.try_recv() {
            meldungen.push(ereignis);
        }
        assert_eq!(
            meldungen,
            vec![
                QsoEreignis::Zustand(QsoZustand::Getrennt),
                QsoEreignis::Zerstoert
            ]
        );
    }

    #[test]
    fn konsole_und_transport_beenden_nur_einmal() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gegenstellen = Gegenstellen::default();
        let mut fabrik = SimFabrik::neu(gegenstellen.clone());

        let mut transport = fabrik
            .erstellen(&station("DL1ABC", 7), QsoEreignisSender::neu(QsoId::new(), tx))
            .unwrap();

        // Gegenstation legt auf, danach trennt auch das Modul
        let gegenstelle = gegenstellen.lock().remove("DL1ABC").unwrap();
        assert!(gegenstelle.beenden());
        transport.trennen();
        assert!(gegenstelle.ist_beendet());

        let mut zerstoert = 0;
        while let Ok(Eingang::Qso { ereignis, .. }) = rx.try_recv() {
            if ereignis == QsoEreignis::Zerstoert {
                zerstoert += 1;
            }
        }
        assert_eq!(zerstoert, 1);
    }

    #[test]
    fn station_ohne_adresse_scheitert() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut fabrik = SimFabrik::neu(Gegenstellen::default());
        let station = StationData::aus_verbindung("DL1ABC", IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let ergebnis = fabrik.erstellen(&station, QsoEreignisSender::neu(QsoId::new(), tx));
        assert!(matches!(ergebnis, Err(FunklinkError::Transport(_))));
    }
}
