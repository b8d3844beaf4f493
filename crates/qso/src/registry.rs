//! Session-Registry – Geordnete Liste aller lebenden Sessions
//!
//! Einzige Quelle fuer "wer ist verbunden". Ordnung:
//! - neue Sessions (ein- und ausgehend) kommen ans Ende
//! - eine getrennte Session wandert an den Anfang, bis sie zerstoert wird
//!
//! Damit steht am Ende immer die zuletzt hinzugefuegte aktive Session (Ziel
//! des lokalen Auflegen-Befehls). Zusaetzlich werden die zuletzt
//! hinzugefuegte Session und die zuletzt getrennte Gegenstation explizit
//! gemerkt, damit Aufrufer nicht auf Listenpositionen angewiesen sind.
//!
//! Alle Operationen sind O(n); n ist einstellig bis niedrig zweistellig.

use funklink_core::{QsoId, StationData};

use crate::session::Qso;

/// Geordnete Sammlung der Sessions
#[derive(Debug, Default)]
pub struct QsoRegistry {
    /// Sessions, Anfang = getrennte, Ende = zuletzt hinzugefuegte
    qsos: Vec<Qso>,
    /// Zuletzt hinzugefuegte Session (solange sie lebt)
    zuletzt_hinzugefuegt: Option<QsoId>,
    /// Identitaet der zuletzt getrennten Gegenstation
    zuletzt_getrennt: Option<StationData>,
}

impl QsoRegistry {
    /// Erstellt eine leere Registry
    pub fn neu() -> Self {
        Self::default()
    }

    /// Haengt eine Session ans Ende
    pub fn hinzufuegen(&mut self, qso: Qso) {
        tracing::debug!(qso = %qso.id(), rufzeichen = %qso.rufzeichen(), "Session registriert");
        self.zuletzt_hinzugefuegt = Some(qso.id());
        self.qsos.push(qso);
    }

    /// Entfernt eine Session
    ///
    /// # Panics
    /// Wenn die Session nicht registriert ist. Das ist ein Programmierfehler
    /// an anderer Stelle und wird nicht abgefangen.
    pub fn entfernen(&mut self, id: QsoId) -> Qso {
        let pos = self
            .position(id)
            .unwrap_or_else(|| panic!("Invariante verletzt: {id} ist nicht registriert"));
        if self.zuletzt_hinzugefuegt == Some(id) {
            self.zuletzt_hinzugefuegt = None;
        }
        let qso = self.qsos.remove(pos);
        tracing::debug!(qso = %id, rufzeichen = %qso.rufzeichen(), "Session entfernt");
        qso
    }

    /// Verschiebt eine Session an den Anfang
    ///
    /// Gibt `false` zurueck wenn die Session nicht registriert ist.
    pub fn an_anfang_verschieben(&mut self, id: QsoId) -> bool {
        match self.position(id) {
            Some(pos) => {
                let qso = self.qsos.remove(pos);
                self.qsos.insert(0, qso);
                true
            }
            None => false,
        }
    }

    /// Ordnet eine gerade getrennte Session ein
    ///
    /// Verschiebt sie an den Anfang und merkt ihre Identitaet als zuletzt
    /// getrennte Gegenstation.
    pub fn getrennt_einordnen(&mut self, id: QsoId) -> bool {
        if !self.an_anfang_verschieben(id) {
            return false;
        }
        self.zuletzt_getrennt = self.qsos.first().map(|q| q.station().clone());
        true
    }

    /// Erste Session (getrennte stehen vorne)
    pub fn anfang(&self) -> Option<&Qso> {
        self.qsos.first()
    }

    /// Letzte Session (zuletzt hinzugefuegt)
    pub fn ende(&self) -> Option<&Qso> {
        self.qsos.last()
    }

    pub fn get(&self, id: QsoId) -> Option<&Qso> {
        self.qsos.iter().find(|q| q.id() == id)
    }

    pub fn get_mut(&mut self, id: QsoId) -> Option<&mut Qso> {
        self.qsos.iter_mut().find(|q| q.id() == id)
    }

    /// Erste Session, auf die das Praedikat zutrifft
    pub fn finden<F>(&self, praedikat: F) -> Option<&Qso>
    where
        F: Fn(&Qso) -> bool,
    {
        self.qsos.iter().find(|q| praedikat(q))
    }

    /// Prueft ob eine Session registriert ist
    pub fn enthaelt(&self, id: QsoId) -> bool {
        self.position(id).is_some()
    }

    /// Anzahl aller Sessions (auch getrennte, noch nicht zerstoerte)
    pub fn anzahl(&self) -> usize {
        self.qsos.len()
    }

    /// Anzahl der nicht getrennten Sessions
    pub fn aktive_anzahl(&self) -> usize {
        self.qsos.iter().filter(|q| !q.ist_getrennt()).count()
    }

    pub fn ist_leer(&self) -> bool {
        self.qsos.is_empty()
    }

    /// Rufzeichen aller nicht getrennten Sessions in Registry-Reihenfolge
    pub fn aktive_rufzeichen(&self) -> Vec<String> {
        self.qsos
            .iter()
            .filter(|q| !q.ist_getrennt())
            .map(|q| q.rufzeichen().to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qso> {
        self.qsos.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Qso> {
        self.qsos.iter_mut()
    }

    pub fn zuletzt_hinzugefuegt(&self) -> Option<QsoId> {
        self.zuletzt_hinzugefuegt
    }

    pub fn zuletzt_getrennt(&self) -> Option<&StationData> {
        self.zuletzt_getrennt.as_ref()
    }

    fn position(&self, id: QsoId) -> Option<usize> {
        self.qsos.iter().position(|q| q.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use funklink_core::{QsoTransport, QsoZustand};
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

    fn qso(call: &str) -> Qso {
        let station = StationData::aus_verbindung(call, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Qso::neu(
            QsoId::new(),
            station,
            call,
            QsoZustand::Verbunden,
            Box::new(StummerTransport),
        )
    }

    fn rufzeichen(reg: &QsoRegistry) -> Vec<String> {
        reg.iter().map(|q| q.rufzeichen().to_string()).collect()
    }

    #[test]
    fn hinzufuegen_am_ende() {
        let mut reg = QsoRegistry::neu();
        let a = qso("A");
        let b = qso("B");
        let b_id = b.id();
        reg.hinzufuegen(a);
        reg.hinzufuegen(b);

        assert_eq!(rufzeichen(&reg), vec!["A", "B"]);
        assert_eq!(reg.ende().map(|q| q.id()), Some(b_id));
        assert_eq!(reg.zuletzt_hinzugefuegt(), Some(b_id));
        assert_eq!(reg.anzahl(), 2);
    }

    #[test]
    fn getrennte_session_wandert_an_den_anfang() {
        let mut reg = QsoRegistry::neu();
        let a = qso("A");
        let b = qso("B");
        let c = qso("C");
        let b_id = b.id();
        reg.hinzufuegen(a);
        reg.hinzufuegen(b);
        reg.hinzufuegen(c);

        reg.get_mut(b_id).unwrap().zustand_setzen(QsoZustand::Getrennt);
        assert!(reg.getrennt_einordnen(b_id));

        assert_eq!(rufzeichen(&reg), vec!["B", "A", "C"]);
        assert_eq!(reg.anfang().map(|q| q.id()), Some(b_id));
        assert_eq!(reg.aktive_anzahl(), 2);
        assert_eq!(reg.anzahl(), 3);
        assert_eq!(reg.zuletzt_getrennt().unwrap().rufzeichen, "B");
        assert_eq!(reg.aktive_rufzeichen(), vec!["A", "C"]);
    }

    #[test]
    fn entfernen_vergisst_zuletzt_hinzugefuegt() {
        let mut reg = QsoRegistry::neu();
        let a = qso("A");
        let a_id = a.id();
        reg.hinzufuegen(a);

        let entfernt = reg.entfernen(a_id);
        assert_eq!(entfernt.rufzeichen(), "A");
        assert!(reg.ist_leer());
        assert_eq!(reg.zuletzt_hinzugefuegt(), None);
    }

    #[test]
    fn zuletzt_getrennt_ueberlebt_zerstoerung() {
        let mut reg = QsoRegistry::neu();
        let a = qso("A");
        let a_id = a.id();
        reg.hinzufuegen(a);
        reg.getrennt_einordnen(a_id);
        reg.entfernen(a_id);

        assert_eq!(reg.zuletzt_getrennt().unwrap().rufzeichen, "A");
    }

    #[test]
    fn finden_mit_praedikat() {
        let mut reg = QsoRegistry::neu();
        reg.hinzufuegen(qso("A"));
        reg.hinzufuegen(qso("B"));

        assert!(reg.finden(|q| q.rufzeichen() == "B").is_some());
        assert!(reg.finden(|q| q.rufzeichen() == "Z").is_none());
    }

    #[test]
    #[should_panic(expected = "Invariante verletzt")]
    fn entfernen_unbekannter_session_ist_fatal() {
        let mut reg = QsoRegistry::neu();
        reg.entfernen(QsoId::new());
    }
}
