//! QSO-Transport – Vertrag fuer eine einzelne Gegenstations-Verbindung
//!
//! Codec und Paket-Transport liegen ausserhalb dieses Projekts. Ein
//! `QsoTransport` kapselt genau eine angenommene oder aufgebaute Verbindung.
//! Rueckmeldungen (Zustand, Audio, Chat, Zerstoerung) laufen nicht ueber
//! Callbacks sondern als Nachrichten ueber den `QsoEreignisSender` in den
//! Eingangskanal des Orchestrators.

use crate::eingang::Eingang;
use crate::error::Result;
use crate::station::StationData;
use crate::types::QsoId;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// QsoZustand
// ---------------------------------------------------------------------------

/// Verbindungszustand einer Session
///
/// ```text
/// Annehmend ----> Verbunden ----> Getrennt
/// Verbindend ---/         \-----/
/// ```
/// `Getrennt` ist endgueltig, eine Session wird nie wiederverwendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QsoZustand {
    /// Eingehende Verbindung, noch nicht angenommen
    Annehmend,
    /// Ausgehende Verbindung wird aufgebaut
    Verbindend,
    /// Verbindung steht
    Verbunden,
    /// Verbindung beendet (Endzustand)
    Getrennt,
}

// ---------------------------------------------------------------------------
// QsoEreignis
// ---------------------------------------------------------------------------

/// Rueckmeldungen einer Session an den Orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum QsoEreignis {
    /// Verbindungszustand hat sich geaendert
    Zustand(QsoZustand),
    /// Gegenstation sendet (true) bzw. hat aufgehoert (false)
    Empfang(bool),
    /// Dekodiertes Audio der Gegenstation
    Audio(Vec<f32>),
    /// Rohes, kodiertes Audiopaket der Gegenstation
    AudioRoh(Bytes),
    /// Chat-Nachricht der Gegenstation
    Chat(String),
    /// Die Session darf freigegeben werden (letzte Meldung)
    Zerstoert,
}

/// Sender, ueber den ein Transport seine Rueckmeldungen abliefert
#[derive(Debug, Clone)]
pub struct QsoEreignisSender {
    id: QsoId,
    tx: mpsc::UnboundedSender<Eingang>,
}

impl QsoEreignisSender {
    /// Erstellt einen Sender fuer die Session `id`
    pub fn neu(id: QsoId, tx: mpsc::UnboundedSender<Eingang>) -> Self {
        Self { id, tx }
    }

    /// ID der Session
    pub fn id(&self) -> QsoId {
        self.id
    }

    /// Liefert eine Rueckmeldung ab
    ///
    /// Gibt `false` zurueck wenn der Orchestrator nicht mehr laeuft.
    pub fn melden(&self, ereignis: QsoEreignis) -> bool {
        self.tx
            .send(Eingang::Qso {
                id: self.id,
                ereignis,
            })
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Befehle an eine einzelne Verbindung
pub trait QsoTransport: Send {
    /// Nimmt eine eingehende Verbindung an
    fn annehmen(&mut self);

    /// Lehnt eine eingehende Verbindung ab
    ///
    /// `mit_hinweis = true`: die Gegenstation bekommt vor dem Trennen eine
    /// Nachricht, sonst wird ohne Hinweis getrennt.
    fn ablehnen(&mut self, mit_hinweis: bool);

    /// Baut eine ausgehende Verbindung auf
    fn verbinden(&mut self);

    /// Trennt die Verbindung
    fn trennen(&mut self);

    /// Sendet Audio vom lokalen Empfaenger
    fn audio_senden(&mut self, samples: &[f32]);

    /// Leitet ein rohes Audiopaket einer anderen Session weiter
    fn audio_roh_senden(&mut self, paket: &Bytes);

    /// Sendet eine Chat-Nachricht
    fn chat_senden(&mut self, text: &str);

    /// Sendet Info-Text (Teilnehmerliste)
    fn info_senden(&mut self, text: &str);

    /// Setzt die lokale Stationsbeschreibung fuer die Gegenstation
    fn lokale_info_setzen(&mut self, text: &str);
}

/// Erstellt Transporte fuer neue Sessions
pub trait TransportFabrik: Send {
    /// Erstellt einen Transport zur Station
    ///
    /// Alle Rueckmeldungen des Transports muessen ueber `sender` laufen.
    fn erstellen(
        &mut self,
        station: &StationData,
        sender: QsoEreignisSender,
    ) -> Result<Box<dyn QsoTransport>>;
}
