//! Teilnehmerliste und Verzeichnis-Beschreibung
//!
//! Bei jedem Sprecherwechsel, jeder Annahme und jedem Abgang bekommen alle
//! verbundenen Sessions eine Klartext-Liste:
//!
//! ```text
//! Funklink 0.1.0 - SM0ABC-L (2)
//!
//! > DL1XYZ         Hans
//!
//! SM0ABC-L         Sysop
//! G4AAA         Jane
//! ```
//!
//! Die Zustellung ist best effort. Ein Transport, der die Liste nicht
//! loswird, wird nicht erneut versucht.

use funklink_core::station::MAX_BESCHREIBUNG;

use crate::floor::FloorArbiter;
use crate::registry::QsoRegistry;

const TRENNER: &str = "         ";

/// Feste Kopfdaten der Teilnehmerliste
#[derive(Debug, Clone, Copy)]
pub struct StatusKopf<'a> {
    pub version: &'a str,
    pub rufzeichen: &'a str,
    pub sysop: &'a str,
}

/// Baut die Teilnehmerliste
pub fn roster_erstellen(kopf: StatusKopf<'_>, registry: &QsoRegistry, floor: &FloorArbiter) -> String {
    let mut text = format!(
        "Funklink {} - {} ({})\n\n",
        kopf.version,
        kopf.rufzeichen,
        registry.aktive_anzahl()
    );

    let sprecher = if floor.squelch_offen() {
        text.push_str(&format!("> {}{TRENNER}{}\n\n", kopf.rufzeichen, kopf.sysop));
        None
    } else {
        let sprecher = floor.sprecher().and_then(|id| registry.get(id));
        if let Some(qso) = sprecher {
            text.push_str(&format!("> {}{TRENNER}{}\n\n", qso.rufzeichen(), qso.name()));
        }
        text.push_str(&format!("{}{TRENNER}{}\n", kopf.rufzeichen, kopf.sysop));
        sprecher.map(|q| q.id())
    };

    for qso in registry.iter().filter(|q| !q.ist_getrennt()) {
        if Some(qso.id()) != sprecher {
            text.push_str(&format!("{}{TRENNER}{}\n", qso.rufzeichen(), qso.name()));
        }
    }

    text
}

/// Sendet einen Info-Text an alle nicht getrennten Sessions
///
/// Gibt die Anzahl der Empfaenger zurueck.
pub fn an_alle_senden(registry: &mut QsoRegistry, text: &str) -> usize {
    let mut gesendet = 0;
    for qso in registry.iter_mut().filter(|q| !q.ist_getrennt()) {
        qso.transport().info_senden(text);
        gesendet += 1;
    }
    tracing::trace!(empfaenger = gesendet, "Teilnehmerliste verteilt");
    gesendet
}

/// Verzeichnis-Beschreibung: Standort plus Anzahl verbundener Stationen
///
/// Bei `anzahl > 0` wird der Standort auf die Feldbreite minus Suffix
/// gekuerzt bzw. mit Leerzeichen aufgefuellt und ` (n)` angehaengt.
pub fn beschreibung_erstellen(standort: &str, anzahl: usize) -> String {
    if anzahl == 0 {
        return standort.to_string();
    }

    let suffix = format!(" ({anzahl})");
    let breite = MAX_BESCHREIBUNG.saturating_sub(suffix.len());
    let mut text: String = standort.chars().take(breite).collect();
    let fehlend = breite.saturating_sub(text.chars().count());
    text.extend(std::iter::repeat(' ').take(fehlend));
    text.push_str(&suffix);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Qso;
    use bytes::Bytes;
    use funklink_core::{QsoId, QsoTransport, QsoZustand, StationData};
    use parking_lot::Mutex;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct InfoMitschnitt(Arc<Mutex<Vec<String>>>);

    impl QsoTransport for InfoMitschnitt {
        fn annehmen(&mut self) {}
        fn ablehnen(&mut self, _mit_hinweis: bool) {}
        fn verbinden(&mut self) {}
        fn trennen(&mut self) {}
        fn audio_senden(&mut self, _samples: &[f32]) {}
        fn audio_roh_senden(&mut self, _paket: &Bytes) {}
        fn chat_senden(&mut self, _text: &str) {}
        fn info_senden(&mut self, text: &str) {
            self.0.lock().push(text.to_string());
        }
        fn lokale_info_setzen(&mut self, _text: &str) {}
    }

    const KOPF: StatusKopf<'static> = StatusKopf {
        version: "0.1.0",
        rufzeichen: "SM0ABC-L",
        sysop: "Sysop",
    };

    fn registry_mit(eintraege: &[(&str, &str)], info: &InfoMitschnitt) -> (QsoRegistry, Vec<QsoId>) {
        let mut reg = QsoRegistry::neu();
        let mut ids = Vec::new();
        for (call, name) in eintraege {
            let station = StationData::aus_verbindung(*call, IpAddr::V4(Ipv4Addr::LOCALHOST));
            let qso = Qso::neu(
                QsoId::new(),
                station,
                *name,
                QsoZustand::Verbunden,
                Box::new(info.clone()),
            );
            ids.push(qso.id());
            reg.hinzufuegen(qso);
        }
        (reg, ids)
    }

    #[test]
    fn roster_ohne_sprecher() {
        let info = InfoMitschnitt::default();
        let (reg, _) = registry_mit(&[("DL1XYZ", "Hans"), ("G4AAA", "Jane")], &info);
        let floor = FloorArbiter::neu();

        let text = roster_erstellen(KOPF, &reg, &floor);
        assert_eq!(
            text,
            "Funklink 0.1.0 - SM0ABC-L (2)\n\n\
             SM0ABC-L         Sysop\n\
             DL1XYZ         Hans\n\
             G4AAA         Jane\n"
        );
    }

    #[test]
    fn roster_mit_sprecher() {
        let info = InfoMitschnitt::default();
        let (mut reg, ids) = registry_mit(&[("DL1XYZ", "Hans"), ("G4AAA", "Jane")], &info);
        let mut floor = FloorArbiter::neu();
        floor.empfang_geaendert(&mut reg, ids[0], true);

        let text = roster_erstellen(KOPF, &reg, &floor);
        assert_eq!(
            text,
            "Funklink 0.1.0 - SM0ABC-L (2)\n\n\
             > DL1XYZ         Hans\n\n\
             SM0ABC-L         Sysop\n\
             G4AAA         Jane\n"
        );
    }

    #[test]
    fn roster_bei_offenem_squelch() {
        let info = InfoMitschnitt::default();
        let (mut reg, ids) = registry_mit(&[("DL1XYZ", "Hans")], &info);
        let mut floor = FloorArbiter::neu();
        floor.empfang_geaendert(&mut reg, ids[0], true);
        floor.squelch_setzen(true);

        let text = roster_erstellen(KOPF, &reg, &floor);
        assert_eq!(
            text,
            "Funklink 0.1.0 - SM0ABC-L (1)\n\n\
             > SM0ABC-L         Sysop\n\n\
             DL1XYZ         Hans\n"
        );
    }

    #[test]
    fn getrennte_sessions_fehlen_und_bekommen_nichts() {
        let info = InfoMitschnitt::default();
        let (mut reg, ids) = registry_mit(&[("DL1XYZ", "Hans"), ("G4AAA", "Jane")], &info);
        reg.get_mut(ids[1]).unwrap().zustand_setzen(QsoZustand::Getrennt);
        let floor = FloorArbiter::neu();

        let text = roster_erstellen(KOPF, &reg, &floor);
        assert!(!text.contains("G4AAA"));
        assert!(text.starts_with("Funklink 0.1.0 - SM0ABC-L (1)"));

        assert_eq!(an_alle_senden(&mut reg, &text), 1);
        assert_eq!(info.0.lock().len(), 1);
    }

    #[test]
    fn beschreibung_mit_anzahl() {
        assert_eq!(beschreibung_erstellen("Stockholm", 0), "Stockholm");

        let text = beschreibung_erstellen("Stockholm", 3);
        assert_eq!(text.len(), MAX_BESCHREIBUNG);
        assert!(text.starts_with("Stockholm "));
        assert!(text.ends_with(" (3)"));

        let lang = beschreibung_erstellen("Ein sehr langer Standortname", 12);
        assert_eq!(lang.len(), MAX_BESCHREIBUNG);
        assert!(lang.ends_with(" (12)"));
    }
}
