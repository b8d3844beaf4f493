//! Session (QSO) – Zustand einer einzelnen Gegenstations-Verbindung
//!
//! Haelt pro Verbindung:
//! - Identitaet der Gegenstation (Rufzeichen, Name, Adresse, Knoten-ID)
//! - Verbindungszustand (`Getrennt` ist endgueltig)
//! - Sende-Status der Gegenstation (fuer die Sprecherrecht-Vergabe)
//! - den Transport (extern), ueber den Befehle an die Gegenstation gehen

use funklink_core::{QsoId, QsoTransport, QsoZustand, StationData};

/// Eine aktive oder gerade beendete Verbindung
pub struct Qso {
    /// Session-ID
    id: QsoId,
    /// Verzeichnisdaten der Gegenstation
    station: StationData,
    /// Anzeigename der Gegenstation
    name: String,
    /// Verbindungszustand
    zustand: QsoZustand,
    /// Sendet die Gegenstation gerade Audio?
    empfaengt: bool,
    /// Laufende Nummer des Sendebeginns (kleiner = frueher)
    empfang_seit: Option<u64>,
    /// Transport zur Gegenstation
    transport: Box<dyn QsoTransport>,
}

impl Qso {
    /// Erstellt eine neue Session
    pub fn neu(
        id: QsoId,
        station: StationData,
        name: impl Into<String>,
        zustand: QsoZustand,
        transport: Box<dyn QsoTransport>,
    ) -> Self {
        Self {
            id,
            station,
            name: name.into(),
            zustand,
            empfaengt: false,
            empfang_seit: None,
            transport,
        }
    }

    pub fn id(&self) -> QsoId {
        self.id
    }

    pub fn rufzeichen(&self) -> &str {
        &self.station.rufzeichen
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn station(&self) -> &StationData {
        &self.station
    }

    pub fn zustand(&self) -> QsoZustand {
        self.zustand
    }

    /// Ist die Session im Endzustand?
    pub fn ist_getrennt(&self) -> bool {
        self.zustand == QsoZustand::Getrennt
    }

    /// Uebernimmt einen neuen Zustand
    ///
    /// Gibt `false` zurueck wenn sich nichts aendert oder die Session schon
    /// getrennt ist (der Endzustand wird nie verlassen).
    pub fn zustand_setzen(&mut self, neu: QsoZustand) -> bool {
        if self.ist_getrennt() || self.zustand == neu {
            return false;
        }
        self.zustand = neu;
        if neu == QsoZustand::Getrennt {
            self.empfaengt = false;
            self.empfang_seit = None;
        }
        true
    }

    pub fn empfaengt(&self) -> bool {
        self.empfaengt
    }

    pub fn empfang_seit(&self) -> Option<u64> {
        self.empfang_seit
    }

    /// Setzt den Sende-Status der Gegenstation
    ///
    /// `laufnummer` markiert den Sendebeginn und bleibt erhalten solange
    /// die Gegenstation durchgehend sendet.
    pub fn empfang_setzen(&mut self, empfaengt: bool, laufnummer: u64) {
        if empfaengt && !self.empfaengt {
            self.empfang_seit = Some(laufnummer);
        } else if !empfaengt {
            self.empfang_seit = None;
        }
        self.empfaengt = empfaengt;
    }

    /// Zugriff auf den Transport
    pub fn transport(&mut self) -> &mut dyn QsoTransport {
        self.transport.as_mut()
    }
}

impl std::fmt::Debug for Qso {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Qso")
            .field("id", &self.id)
            .field("rufzeichen", &self.station.rufzeichen)
            .field("zustand", &self.zustand)
            .field("empfaengt", &self.empfaengt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::net::{IpAddr, Ipv4Addr};

    struct StummerTransport;

    impl QsoTransport for StummerTransport {
        fn annehmen(&mut self) {}
        fn ablehnen(&mut self, _mit_hinweis: bool) {}
        fn verbinden(&mut self) {}
        fn trennen(&mut self) {}
        fn audio_senden(&mut self, _samples: &[f32]) {}
        fn audio_roh_senden(&mut self, _paket: &Bytes) {}
        fn chat_senden(&mut self, _text: &str) {}
        fn info_senden(&mut self, _text: &str) {}
        fn lokale_info_setzen(&mut self, _text: &str) {}
    }

    fn test_qso() -> Qso {
        let station =
            StationData::aus_verbindung("SM0ABC", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        Qso::neu(
            QsoId::new(),
            station,
            "Anna",
            QsoZustand::Annehmend,
            Box::new(StummerTransport),
        )
    }

    #[test]
    fn getrennt_ist_endgueltig() {
        let mut qso = test_qso();
        assert!(qso.zustand_setzen(QsoZustand::Verbunden));
        assert!(qso.zustand_setzen(QsoZustand::Getrennt));
        assert!(qso.ist_getrennt());

        // Keine Rueckkehr aus dem Endzustand
        assert!(!qso.zustand_setzen(QsoZustand::Verbunden));
        assert!(!qso.zustand_setzen(QsoZustand::Getrennt));
        assert_eq!(qso.zustand(), QsoZustand::Getrennt);
    }

    #[test]
    fn empfang_merkt_sendebeginn() {
        let mut qso = test_qso();
        qso.empfang_setzen(true, 7);
        qso.empfang_setzen(true, 9);
        assert_eq!(qso.empfang_seit(), Some(7));

        qso.empfang_setzen(false, 10);
        assert!(!qso.empfaengt());
        assert_eq!(qso.empfang_seit(), None);
    }

    #[test]
    fn trennen_beendet_empfang() {
        let mut qso = test_qso();
        qso.empfang_setzen(true, 1);
        qso.zustand_setzen(QsoZustand::Getrennt);
        assert!(!qso.empfaengt());
    }
}
