//! Aufloesung von Knoten-IDs gegen das Verzeichnis
//!
//! Ist eine angeforderte ID nicht in der aktuellen Liste, wird sie vorgemerkt
//! und erst nach der naechsten Listen-Aktualisierung genau einmal
//! aufgeloest. Es steht hoechstens eine ID aus; eine neue Anforderung
//! ersetzt die alte ohne Meldung.

use funklink_core::{ModulEvent, NodeId, StationData, Verzeichnis};

/// Ergebnis einer verzoegerten Aufloesung
#[derive(Debug, Clone, PartialEq)]
pub enum Aufloesung {
    /// ID gefunden, Verbindung aufbauen
    Gefunden(StationData),
    /// ID auch nach Aktualisierung unbekannt
    NichtGefunden(NodeId),
}

impl Aufloesung {
    /// Meldung fuer den Fehlschlag, falls einer vorliegt
    pub fn ereignis(&self) -> Option<ModulEvent> {
        match self {
            Self::Gefunden(_) => None,
            Self::NichtGefunden(id) => Some(ModulEvent::StationIdNotFound(*id)),
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeIdResolver {
    ausstehend: Option<NodeId>,
}

impl NodeIdResolver {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Sucht eine ID sofort
    ///
    /// Bei einem Treffer kommt die Station zurueck. Sonst wird die ID
    /// vorgemerkt und `None` geliefert; der Aufrufer stoesst dann die
    /// Aktualisierung des Verzeichnisses an.
    pub fn anfordern(&mut self, id: NodeId, verzeichnis: &dyn Verzeichnis) -> Option<StationData> {
        if let Some(station) = verzeichnis.nach_id(id) {
            return Some(station);
        }

        if let Some(alt) = self.ausstehend.replace(id) {
            tracing::debug!(alt = %alt, neu = %id, "Ausstehende Knoten-ID ersetzt");
        }
        tracing::info!(id = %id, "Knoten-ID nicht in der Liste, Liste wird aktualisiert");
        None
    }

    /// Loest die ausstehende ID nach einer Aktualisierung auf
    ///
    /// Gibt `None` zurueck wenn nichts aussteht.
    pub fn aufloesen(&mut self, verzeichnis: &dyn Verzeichnis) -> Option<Aufloesung> {
        let id = self.ausstehend.take()?;
        match verzeichnis.nach_id(id) {
            Some(station) => Some(Aufloesung::Gefunden(station)),
            None => {
                tracing::warn!(id = %id, "Knoten-ID nicht gefunden");
                Some(Aufloesung::NichtGefunden(id))
            }
        }
    }

    /// Verzeichnisfehler: die ausstehende ID wird aufgegeben
    pub fn fehler(&mut self) -> Option<ModulEvent> {
        self.ausstehend.take().map(ModulEvent::LookupFailed)
    }

    pub fn ausstehend(&self) -> Option<NodeId> {
        self.ausstehend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funklink_core::{StationListe, StationStatus, StationsTyp};
    use std::net::{IpAddr, Ipv4Addr};

    #[derive(Default)]
    struct ListenVerzeichnis(StationListe);

    impl Verzeichnis for ListenVerzeichnis {
        fn online_gehen(&mut self) {}
        fn aktualisieren(&mut self) {}
        fn nach_id(&self, id: NodeId) -> Option<StationData> {
            self.0.nach_id(id).cloned()
        }
        fn nach_rufzeichen(&self, rufzeichen: &str) -> Option<StationData> {
            self.0.nach_rufzeichen(rufzeichen).cloned()
        }
        fn nach_code(&self, code: &str, exakt: bool) -> Vec<StationData> {
            self.0.nach_code(code, exakt)
        }
        fn nach_typ(&self, typ: StationsTyp) -> Vec<StationData> {
            self.0.nach_typ(typ)
        }
        fn status(&self) -> StationStatus {
            StationStatus::Online
        }
        fn beschreibung_setzen(&mut self, _beschreibung: &str) {}
        fn registrierung_aktualisieren(&mut self) {}
        fn nachricht(&self) -> String {
            String::new()
        }
    }

    fn station(id: u32) -> StationData {
        StationData::neu("SM0ABC-L", NodeId(id), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
    }

    #[test]
    fn bekannte_id_sofort() {
        let dir = ListenVerzeichnis(StationListe::neu(vec![station(12345)]));
        let mut resolver = NodeIdResolver::neu();

        assert_eq!(resolver.anfordern(NodeId(12345), &dir), Some(station(12345)));
        assert_eq!(resolver.ausstehend(), None);
    }

    #[test]
    fn unbekannte_id_nach_aktualisierung_gefunden() {
        let mut dir = ListenVerzeichnis::default();
        let mut resolver = NodeIdResolver::neu();

        assert_eq!(resolver.anfordern(NodeId(12345), &dir), None);
        assert_eq!(resolver.ausstehend(), Some(NodeId(12345)));

        dir.0.ersetzen(vec![station(12345)]);
        assert_eq!(
            resolver.aufloesen(&dir),
            Some(Aufloesung::Gefunden(station(12345)))
        );
        // Genau einmal
        assert_eq!(resolver.aufloesen(&dir), None);
    }

    #[test]
    fn unbekannte_id_bleibt_unbekannt() {
        let dir = ListenVerzeichnis::default();
        let mut resolver = NodeIdResolver::neu();
        resolver.anfordern(NodeId(12345), &dir);

        let ergebnis = resolver.aufloesen(&dir).unwrap();
        assert_eq!(
            ergebnis.ereignis(),
            Some(ModulEvent::StationIdNotFound(NodeId(12345)))
        );
        assert_eq!(resolver.ausstehend(), None);
    }

    #[test]
    fn neue_anforderung_ersetzt_alte_still() {
        let dir = ListenVerzeichnis::default();
        let mut resolver = NodeIdResolver::neu();
        resolver.anfordern(NodeId(1), &dir);
        resolver.anfordern(NodeId(2), &dir);

        assert_eq!(resolver.ausstehend(), Some(NodeId(2)));
    }

    #[test]
    fn verzeichnisfehler_gibt_id_auf() {
        let dir = ListenVerzeichnis::default();
        let mut resolver = NodeIdResolver::neu();
        assert_eq!(resolver.fehler(), None);

        resolver.anfordern(NodeId(7), &dir);
        assert_eq!(resolver.fehler(), Some(ModulEvent::LookupFailed(NodeId(7))));
        assert_eq!(resolver.ausstehend(), None);
    }
}
