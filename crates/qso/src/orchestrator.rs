//! Session-Orchestrator – Herzstueck des Moduls
//!
//! Nimmt alle Eingaenge (`Eingang`) nacheinander entgegen und verbindet:
//! - Zulassung eingehender Verbindungen (Regeln, Obergrenzen, Kanal)
//! - Aufbau ausgehender Verbindungen (nach Abschluss der Ansagen)
//! - Tastenfeld-Befehle, Connect by Call und Knoten-ID-Aufloesung
//! - Sprecherrecht, Audio- und Chat-Weiterleitung
//! - Verzeichnis-Praesenz und periodische Listen-Aktualisierung
//!
//! Es gibt genau einen Verarbeiter: `laufen` liest den Eingangskanal und
//! ruft `verarbeiten` fuer jede Nachricht auf. Sessions melden sich ueber
//! denselben Kanal zurueck, ihre Zerstoerung wird daher nie mitten in einer
//! anderen Verarbeitung ausgefuehrt.

use std::net::IpAddr;

use bytes::Bytes;
use funklink_core::{
    Eingang, ModulEvent, NodeId, QsoEreignis, QsoEreignisSender, QsoId, QsoZustand,
    StationData, StationStatus, StationsTyp, TimerArt,
};
use rand::seq::SliceRandom;
use tokio::sync::{mpsc, watch};

use crate::call_code::{CallCodeResolver, CbcAktion};
use crate::command::{befehl_parsen, Befehl, ZufallsZiel};
use crate::config::ModulKonfig;
use crate::floor::FloorArbiter;
use crate::kontext::ModulKontext;
use crate::node_id::{Aufloesung, NodeIdResolver};
use crate::policy::Zugang;
use crate::registry::QsoRegistry;
use crate::session::Qso;
use crate::status::{an_alle_senden, beschreibung_erstellen, roster_erstellen, StatusKopf};
use crate::timer::Zeitgeber;

/// Version fuer die Teilnehmerliste
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Koordiniert alle Sessions einer Modul-Instanz
pub struct QsoOrchestrator {
    konfig: ModulKonfig,
    kontext: ModulKontext,
    tx: mpsc::UnboundedSender<Eingang>,

    registry: QsoRegistry,
    floor: FloorArbiter,
    cbc: CallCodeResolver,
    node_ids: NodeIdResolver,
    verzeichnis_timer: Zeitgeber,

    /// Ausgehende Session, die auf das Ende der Ansagen wartet
    ausstehend_ausgehend: Option<QsoId>,
    /// Modul wurde durch eine eingehende Verbindung aktiviert
    fernaktivierung: bool,
    /// Nur-Hoeren: kein Audio vom lokalen Empfaenger, keine Weiterleitung
    nur_hoeren: bool,
    /// Letzte geloggte Nachricht des Verzeichnisservers
    letzte_nachricht: String,
}

impl QsoOrchestrator {
    /// Erstellt den Orchestrator und seinen Eingangskanal
    ///
    /// Der Empfaenger wird an `laufen` uebergeben, Sender fuer externe
    /// Quellen liefert `eingang_sender`.
    pub fn neu(konfig: ModulKonfig, kontext: ModulKontext) -> (Self, mpsc::UnboundedReceiver<Eingang>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cbc = CallCodeResolver::neu(konfig.cbc_frist);
        let orchestrator = Self {
            konfig,
            kontext,
            tx,
            registry: QsoRegistry::neu(),
            floor: FloorArbiter::neu(),
            cbc,
            node_ids: NodeIdResolver::neu(),
            verzeichnis_timer: Zeitgeber::neu(TimerArt::Verzeichnis),
            ausstehend_ausgehend: None,
            fernaktivierung: false,
            nur_hoeren: false,
            letzte_nachricht: String::new(),
        };
        (orchestrator, rx)
    }

    /// Sender fuer Eingaenge von aussen
    pub fn eingang_sender(&self) -> mpsc::UnboundedSender<Eingang> {
        self.tx.clone()
    }

    // -----------------------------------------------------------------------
    // Lebenszyklus
    // -----------------------------------------------------------------------

    /// Meldet die Station am Verzeichnis an
    pub fn starten(&mut self) {
        tracing::info!(
            rufzeichen = %self.konfig.rufzeichen,
            max_verbindungen = self.konfig.max_verbindungen,
            max_qsos = self.konfig.max_qsos,
            "QSO-Orchestrator gestartet"
        );
        self.kontext.verzeichnis.online_gehen();
        self.variablen_aktualisieren();
    }

    /// Verarbeitet Eingaenge bis zum Shutdown-Signal
    pub async fn laufen(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Eingang>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        self.starten();

        loop {
            tokio::select! {
                eingang = rx.recv() => {
                    match eingang {
                        Some(eingang) => self.verarbeiten(eingang),
                        None => break,
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Shutdown-Signal empfangen");
                        break;
                    }
                }
            }
        }

        self.beenden();
    }

    /// Trennt alle Sessions und stoppt die Timer
    pub fn beenden(&mut self) {
        for qso in self.registry.iter_mut().filter(|q| !q.ist_getrennt()) {
            qso.transport().trennen();
        }
        self.verzeichnis_timer.abbrechen();
        self.cbc.zuruecksetzen();
        tracing::info!(sessions = self.registry.anzahl(), "QSO-Orchestrator beendet");
    }

    /// Verarbeitet einen einzelnen Eingang
    pub fn verarbeiten(&mut self, eingang: Eingang) {
        match eingang {
            Eingang::EingehendeVerbindung {
                adresse,
                rufzeichen,
                name,
            } => self.eingehende_verbindung(adresse, &rufzeichen, &name),
            Eingang::Befehl(befehl) => self.befehl_empfangen(&befehl),
            Eingang::Squelch(offen) => self.squelch(offen),
            Eingang::EmpfaengerAudio(samples) => self.empfaenger_audio(&samples),
            Eingang::AnsagenAbgespielt => self.ansagen_abgespielt(),
            Eingang::Aktiviert => self.aktiviert(),
            Eingang::Deaktiviert => self.deaktiviert(),
            Eingang::StatusBericht => {
                self.melden(ModulEvent::StatusReport(self.registry.aktive_anzahl()))
            }
            Eingang::VerzeichnisStatus(status) => self.verzeichnis_status(status),
            Eingang::StationslisteAktualisiert => self.stationsliste_aktualisiert(),
            Eingang::VerzeichnisFehler(meldung) => self.verzeichnis_fehler(&meldung),
            Eingang::Qso { id, ereignis } => self.qso_ereignis(id, ereignis),
            Eingang::Timer { art, generation } => self.timer_abgelaufen(art, generation),
        }
    }

    // -----------------------------------------------------------------------
    // Zulassung eingehender Verbindungen
    // -----------------------------------------------------------------------

    fn eingehende_verbindung(&mut self, adresse: IpAddr, rufzeichen: &str, name: &str) {
        tracing::info!(rufzeichen, name, adresse = %adresse, "Eingehende Verbindung");

        let zugang = self.konfig.policy.pruefen(rufzeichen);
        if zugang == Zugang::Verwerfen {
            tracing::warn!(rufzeichen, "Verbindung laut Konfiguration verworfen");
            return;
        }

        if self.registry.anzahl() >= self.konfig.max_verbindungen {
            tracing::warn!(
                rufzeichen,
                anzahl = self.registry.anzahl(),
                "Verbindung ignoriert, zu viele Verbindungen"
            );
            return;
        }

        let vertraut = self
            .konfig
            .vertrauens_netz
            .is_some_and(|netz| netz.enthaelt(&adresse));
        let station = if vertraut {
            StationData::aus_verbindung(rufzeichen, adresse)
        } else {
            match self.kontext.verzeichnis.nach_rufzeichen(rufzeichen) {
                Some(station) => station,
                None => {
                    tracing::info!(rufzeichen, "Rufzeichen unbekannt, Liste wird aktualisiert");
                    self.verzeichnisliste_holen();
                    return;
                }
            }
        };

        if station.ip != adresse {
            tracing::warn!(
                rufzeichen,
                registriert = %station.ip,
                adresse = %adresse,
                "Verbindung ignoriert, Adresse passt nicht zum Verzeichnis"
            );
            return;
        }

        let Some(id) = self.session_erstellen(station, name, QsoZustand::Annehmend) else {
            return;
        };

        if self.registry.anzahl() > self.konfig.max_qsos {
            tracing::info!(rufzeichen, "Keine freien QSO-Plaetze, Verbindung abgelehnt");
            self.mit_session(id, |qso| qso.transport().ablehnen(false));
            return;
        }

        if zugang == Zugang::Ablehnen {
            tracing::info!(rufzeichen, "Verbindung laut Konfiguration abgelehnt");
            self.mit_session(id, |qso| qso.transport().ablehnen(true));
            return;
        }

        let war_aktiv = self.kontext.kanal.ist_aktiv();
        if !self.kontext.kanal.aktivieren() {
            tracing::warn!(rufzeichen, "Kanal belegt, Verbindung abgelehnt");
            self.mit_session(id, |qso| qso.transport().ablehnen(false));
            return;
        }
        if !war_aktiv {
            self.fernaktivierung = true;
        }

        self.mit_session(id, |qso| qso.transport().annehmen());
        self.status_senden();
        self.beschreibung_aktualisieren();
        self.kontext.kanal.leerlauf_setzen(false);
    }

    /// Erstellt eine Session samt Transport und haengt sie an die Registry
    fn session_erstellen(
        &mut self,
        station: StationData,
        name: &str,
        zustand: QsoZustand,
    ) -> Option<QsoId> {
        let id = QsoId::new();
        let sender = QsoEreignisSender::neu(id, self.tx.clone());
        let mut transport = match self.kontext.transporte.erstellen(&station, sender) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(rufzeichen = %station.rufzeichen, fehler = %e, "Session konnte nicht erstellt werden");
                return None;
            }
        };
        transport.lokale_info_setzen(&self.konfig.beschreibung);

        self.registry
            .hinzufuegen(Qso::neu(id, station, name, zustand, transport));
        self.variablen_aktualisieren();
        Some(id)
    }

    fn mit_session<F>(&mut self, id: QsoId, f: F)
    where
        F: FnOnce(&mut Qso),
    {
        if let Some(qso) = self.registry.get_mut(id) {
            f(qso);
        }
    }

    // -----------------------------------------------------------------------
    // Ausgehende Verbindungen
    // -----------------------------------------------------------------------

    fn ausgehende_verbindung(&mut self, station: StationData) {
        let rufzeichen = station.rufzeichen.clone();

        if rufzeichen.eq_ignore_ascii_case(&self.konfig.rufzeichen) {
            tracing::warn!(rufzeichen = %rufzeichen, "Verbindung zu sich selbst verweigert");
            self.melden(ModulEvent::SelfConnect);
            return;
        }

        let verbunden = self
            .registry
            .finden(|q| q.rufzeichen() == rufzeichen && !q.ist_getrennt())
            .is_some();
        if verbunden {
            tracing::warn!(rufzeichen = %rufzeichen, "Bereits verbunden");
            self.melden(ModulEvent::AlreadyConnectedTo(rufzeichen));
            return;
        }

        if self.registry.anzahl() >= self.konfig.max_verbindungen {
            self.melden(ModulEvent::NoMoreConnectionsAllowed);
            return;
        }

        tracing::info!(rufzeichen = %rufzeichen, id = ?station.id, "Verbindung wird aufgebaut");
        let Some(id) = self.session_erstellen(station, "", QsoZustand::Verbindend) else {
            self.melden(ModulEvent::InternalError);
            return;
        };

        self.melden(ModulEvent::ConnectingTo(rufzeichen));

        if let Some(alt) = self.ausstehend_ausgehend.replace(id) {
            tracing::debug!(qso = %alt, "Ausstehende Verbindung ersetzt");
            if let Some(qso) = self.registry.get_mut(alt).filter(|q| !q.ist_getrennt()) {
                qso.transport().trennen();
            }
        }

        self.kontext.kanal.leerlauf_setzen(false);
    }

    /// Alle Ansagen sind abgespielt: ausstehende Verbindung jetzt aufbauen
    fn ansagen_abgespielt(&mut self) {
        let Some(id) = self.ausstehend_ausgehend.take() else {
            return;
        };
        match self.registry.get_mut(id).filter(|q| !q.ist_getrennt()) {
            Some(qso) => qso.transport().verbinden(),
            None => return,
        }
        self.beschreibung_aktualisieren();
        self.status_senden();
    }

    fn verbinden_nach_id(&mut self, id: NodeId) {
        if self.registry.anzahl() >= self.konfig.max_qsos {
            self.melden(ModulEvent::NoMoreConnectionsAllowed);
            return;
        }

        let status = self.kontext.verzeichnis.status();
        if !status.ist_erreichbar() {
            tracing::error!(status = %status, "Verzeichnis offline, keine ausgehende Verbindung");
            self.melden(ModulEvent::DirectoryServerOffline);
            return;
        }

        match self.node_ids.anfordern(id, self.kontext.verzeichnis.as_ref()) {
            Some(station) => self.ausgehende_verbindung(station),
            None => self.verzeichnisliste_holen(),
        }
    }

    // -----------------------------------------------------------------------
    // Befehle
    // -----------------------------------------------------------------------

    fn befehl_empfangen(&mut self, eingabe: &str) {
        tracing::info!(befehl = eingabe, "Befehl empfangen");
        self.fernaktivierung = false;

        if self.cbc.ist_aktiv() {
            let aktion = self.cbc.auswahl(eingabe, &self.tx);
            self.cbc_aktion(aktion);
            return;
        }

        match befehl_parsen(eingabe) {
            Befehl::Trennen => self.letzte_trennen(),
            Befehl::ConnectByCall(befehl) => {
                let aktion =
                    self.cbc
                        .suche_starten(&befehl, self.kontext.verzeichnis.as_ref(), &self.tx);
                self.cbc_aktion(aktion);
            }
            Befehl::Hilfe => self.melden(ModulEvent::PlayHelp),
            Befehl::ListeVerbunden => {
                self.melden(ModulEvent::ListConnectedStations(
                    self.registry.aktive_rufzeichen(),
                ))
            }
            Befehl::EigeneId => {
                let id = self
                    .kontext
                    .verzeichnis
                    .nach_rufzeichen(&self.konfig.rufzeichen)
                    .and_then(|s| s.id)
                    .map(|id| id.wert())
                    .unwrap_or(0);
                self.melden(ModulEvent::PlayNodeId(id));
            }
            Befehl::Zufall(ziel) => self.zufallsverbindung(ziel, eingabe),
            Befehl::Wiederverbinden => {
                match self.registry.zuletzt_getrennt().and_then(|s| s.id) {
                    Some(id) => {
                        tracing::info!(id = %id, "Letzte Station wird neu verbunden");
                        self.verbinden_nach_id(id);
                    }
                    None => self.melden(ModulEvent::CommandFailed(eingabe.to_string())),
                }
            }
            Befehl::NurHoeren(neu) => {
                self.melden(ModulEvent::ListenOnly {
                    alt: self.nur_hoeren,
                    neu,
                });
                self.nur_hoeren = neu;
            }
            Befehl::Verbinden(id) => self.verbinden_nach_id(id),
            Befehl::Fehlgeschlagen(befehl) => self.melden(ModulEvent::CommandFailed(befehl)),
            Befehl::Unbekannt(befehl) => self.melden(ModulEvent::UnknownCommand(befehl)),
        }
    }

    /// Leere Eingabe: letzte Session trennen, sonst Modul beenden
    fn letzte_trennen(&mut self) {
        let ziel = self
            .registry
            .zuletzt_hinzugefuegt()
            .filter(|id| self.registry.get(*id).is_some_and(|q| !q.ist_getrennt()))
            .or_else(|| self.registry.ende().filter(|q| !q.ist_getrennt()).map(|q| q.id()));
        match ziel.and_then(|id| self.registry.get_mut(id)) {
            Some(qso) => {
                tracing::info!(rufzeichen = %qso.rufzeichen(), "Letzte Verbindung wird getrennt");
                qso.transport().trennen();
            }
            None => self.modul_deaktivieren(),
        }
    }

    fn zufallsverbindung(&mut self, ziel: ZufallsZiel, eingabe: &str) {
        let verzeichnis = &self.kontext.verzeichnis;
        let pool = match ziel {
            ZufallsZiel::LinkOderRepeater => {
                let mut pool = verzeichnis.nach_typ(StationsTyp::Link);
                pool.extend(verzeichnis.nach_typ(StationsTyp::Repeater));
                pool
            }
            ZufallsZiel::Konferenz => verzeichnis.nach_typ(StationsTyp::Konferenz),
        };

        match pool.choose(&mut rand::thread_rng()).cloned() {
            Some(station) => {
                tracing::info!(rufzeichen = %station.rufzeichen, "Zufallsverbindung");
                self.ausgehende_verbindung(station);
            }
            None => self.melden(ModulEvent::CommandFailed(eingabe.to_string())),
        }
    }

    fn cbc_aktion(&mut self, aktion: CbcAktion) {
        match aktion {
            CbcAktion::Melden(event) => self.melden(event),
            CbcAktion::Verbinden(station) => self.ausgehende_verbindung(station),
        }
    }

    // -----------------------------------------------------------------------
    // Lokaler Kanal
    // -----------------------------------------------------------------------

    fn squelch(&mut self, offen: bool) {
        self.floor.squelch_setzen(offen);
        self.kontext
            .kanal
            .leerlauf_setzen(!offen && self.registry.ist_leer());
        self.status_senden();
    }

    fn empfaenger_audio(&mut self, samples: &[f32]) {
        if self.nur_hoeren {
            return;
        }
        for qso in self.registry.iter_mut().filter(|q| !q.ist_getrennt()) {
            qso.transport().audio_senden(samples);
        }
    }

    fn aktiviert(&mut self) {
        tracing::debug!("Modul aktiviert");
        self.variablen_aktualisieren();
        self.cbc.zuruecksetzen();
        self.nur_hoeren = false;
    }

    fn deaktiviert(&mut self) {
        tracing::debug!("Modul deaktiviert");
        self.fernaktivierung = false;
        self.cbc.zuruecksetzen();
        self.nur_hoeren = false;
    }

    fn modul_deaktivieren(&mut self) {
        if self.kontext.kanal.ist_aktiv() {
            self.kontext.kanal.deaktivieren();
        }
        self.deaktiviert();
    }

    // -----------------------------------------------------------------------
    // Verzeichnis
    // -----------------------------------------------------------------------

    /// Fordert eine neue Liste an und plant die naechste Aktualisierung
    fn verzeichnisliste_holen(&mut self) {
        self.verzeichnis_timer.abbrechen();
        if self.kontext.verzeichnis.status().ist_erreichbar() {
            tracing::debug!("Verzeichnisliste wird aktualisiert");
            self.kontext.verzeichnis.aktualisieren();
            self.verzeichnis_timer
                .starten(self.konfig.verzeichnis_intervall, &self.tx);
        }
    }

    fn verzeichnis_status(&mut self, status: StationStatus) {
        tracing::info!(status = %status, "Verzeichnisstatus geaendert");
        if status.ist_erreichbar() {
            if !self.verzeichnis_timer.ist_aktiv() {
                self.verzeichnisliste_holen();
            }
        } else {
            self.verzeichnis_timer.abbrechen();
        }
    }

    fn stationsliste_aktualisiert(&mut self) {
        match self.node_ids.aufloesen(self.kontext.verzeichnis.as_ref()) {
            Some(Aufloesung::Gefunden(station)) => self.ausgehende_verbindung(station),
            Some(nicht_gefunden) => {
                if let Some(event) = nicht_gefunden.ereignis() {
                    self.melden(event);
                }
            }
            None => {}
        }

        let nachricht = self.kontext.verzeichnis.nachricht();
        if nachricht != self.letzte_nachricht {
            tracing::info!(nachricht = %nachricht, "Nachricht des Verzeichnisservers");
            self.letzte_nachricht = nachricht;
        }
    }

    fn verzeichnis_fehler(&mut self, meldung: &str) {
        tracing::error!(fehler = meldung, "Verzeichnisfehler");
        if let Some(event) = self.node_ids.fehler() {
            self.melden(event);
        }
    }

    fn timer_abgelaufen(&mut self, art: TimerArt, generation: u64) {
        match art {
            TimerArt::CallCode => {
                if let Some(event) = self.cbc.zeitablauf(generation) {
                    self.melden(event);
                }
            }
            TimerArt::Verzeichnis => {
                if self.verzeichnis_timer.abgelaufen(generation) {
                    self.verzeichnisliste_holen();
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Session-Rueckmeldungen
    // -----------------------------------------------------------------------

    fn qso_ereignis(&mut self, id: QsoId, ereignis: QsoEreignis) {
        if ereignis == QsoEreignis::Zerstoert {
            self.session_zerstoert(id);
            return;
        }
        if !self.registry.enthaelt(id) {
            tracing::trace!(qso = %id, "Rueckmeldung einer unbekannten Session verworfen");
            return;
        }

        match ereignis {
            QsoEreignis::Zustand(zustand) => self.zustand_geaendert(id, zustand),
            QsoEreignis::Empfang(empfaengt) => {
                let wechsel = self.floor.empfang_geaendert(&mut self.registry, id, empfaengt);
                if wechsel.status_senden {
                    self.status_senden();
                }
                if let Some(tasten) = wechsel.tasten {
                    self.kontext.kanal.senden(tasten);
                }
            }
            QsoEreignis::Audio(samples) => {
                if self.floor.zum_lokalen_kanal(id) {
                    self.kontext.kanal.audio_ausgeben(&samples);
                }
            }
            QsoEreignis::AudioRoh(paket) => self.audio_weiterleiten(id, &paket),
            QsoEreignis::Chat(text) => {
                for qso in self
                    .registry
                    .iter_mut()
                    .filter(|q| q.id() != id && !q.ist_getrennt())
                {
                    qso.transport().chat_senden(&text);
                }
            }
            QsoEreignis::Zerstoert => {}
        }
    }

    fn zustand_geaendert(&mut self, id: QsoId, zustand: QsoZustand) {
        let geaendert = self
            .registry
            .get_mut(id)
            .is_some_and(|qso| qso.zustand_setzen(zustand));
        if !geaendert {
            return;
        }

        if zustand == QsoZustand::Getrennt {
            self.registry.getrennt_einordnen(id);
            self.variablen_aktualisieren();
            if let Some(station) = self.registry.zuletzt_getrennt() {
                tracing::info!(rufzeichen = %station.rufzeichen, "Verbindung getrennt");
            }

            if let Some(tasten) = self.floor.qso_abgegangen(&self.registry, id) {
                self.kontext.kanal.senden(tasten);
                self.status_senden();
            }

            let letzte_getrennt = self.registry.ende().is_some_and(|q| q.ist_getrennt());
            if self.fernaktivierung && letzte_getrennt {
                self.modul_deaktivieren();
            }
        } else {
            tracing::debug!(qso = %id, zustand = ?zustand, "Session-Zustand geaendert");
            self.variablen_aktualisieren();
        }
    }

    fn audio_weiterleiten(&mut self, quelle: QsoId, paket: &Bytes) {
        if self.nur_hoeren || !self.floor.an_andere_weiterleiten(quelle) {
            return;
        }
        for qso in self
            .registry
            .iter_mut()
            .filter(|q| q.id() != quelle && !q.ist_getrennt())
        {
            qso.transport().audio_roh_senden(paket);
        }
    }

    fn session_zerstoert(&mut self, id: QsoId) {
        let qso = self.registry.entfernen(id);
        tracing::debug!(rufzeichen = %qso.rufzeichen(), "Session zerstoert");
        drop(qso);
        self.variablen_aktualisieren();

        if let Some(tasten) = self.floor.qso_abgegangen(&self.registry, id) {
            self.kontext.kanal.senden(tasten);
        }
        if self.ausstehend_ausgehend == Some(id) {
            self.ausstehend_ausgehend = None;
        }

        self.status_senden();
        self.beschreibung_aktualisieren();

        if self.registry.ist_leer() && !self.floor.squelch_offen() {
            self.kontext.kanal.leerlauf_setzen(true);
        }
    }

    // -----------------------------------------------------------------------
    // Meldungen
    // -----------------------------------------------------------------------

    fn melden(&self, event: ModulEvent) {
        tracing::debug!(event = %event, "Ereignis");
        self.kontext.ereignisse.senden(&event);
    }

    fn variablen_aktualisieren(&self) {
        let name = format!("{}::num_connected_stations", self.konfig.name);
        let wert = self.registry.aktive_anzahl().to_string();
        self.kontext.ereignisse.variable_setzen(&name, &wert);
    }

    /// Verteilt die Teilnehmerliste (nur bei mehr als einem QSO-Platz)
    fn status_senden(&mut self) {
        if self.konfig.max_qsos < 2 {
            return;
        }
        let kopf = StatusKopf {
            version: VERSION,
            rufzeichen: &self.konfig.rufzeichen,
            sysop: &self.konfig.sysop_name,
        };
        let text = roster_erstellen(kopf, &self.registry, &self.floor);
        an_alle_senden(&mut self.registry, &text);
    }

    /// Aktualisiert die Verzeichnis-Beschreibung (nur bei mehr als einem QSO-Platz)
    fn beschreibung_aktualisieren(&mut self) {
        if self.konfig.max_qsos < 2 {
            return;
        }
        let text = beschreibung_erstellen(&self.konfig.standort, self.registry.aktive_anzahl());
        self.kontext.verzeichnis.beschreibung_setzen(&text);
        self.kontext.verzeichnis.registrierung_aktualisieren();
    }

    // -----------------------------------------------------------------------
    // Zustandsabfragen
    // -----------------------------------------------------------------------

    pub fn registry(&self) -> &QsoRegistry {
        &self.registry
    }

    pub fn floor(&self) -> &FloorArbiter {
        &self.floor
    }

    pub fn cbc(&self) -> &CallCodeResolver {
        &self.cbc
    }

    pub fn ausstehende_id(&self) -> Option<NodeId> {
        self.node_ids.ausstehend()
    }

    pub fn ausstehend_ausgehend(&self) -> Option<QsoId> {
        self.ausstehend_ausgehend
    }

    pub fn fernaktivierung(&self) -> bool {
        self.fernaktivierung
    }

    pub fn nur_hoeren(&self) -> bool {
        self.nur_hoeren
    }

    pub fn verzeichnis_timer_aktiv(&self) -> bool {
        self.verzeichnis_timer.ist_aktiv()
    }
}

impl std::fmt::Debug for QsoOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QsoOrchestrator")
            .field("rufzeichen", &self.konfig.rufzeichen)
            .field("registry", &self.registry)
            .field("floor", &self.floor)
            .field("nur_hoeren", &self.nur_hoeren)
            .finish_non_exhaustive()
    }
}
