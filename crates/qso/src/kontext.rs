//! Modul-Kontext – die externen Kollaborateure einer Modul-Instanz
//!
//! Wird einmal pro Instanz gebaut und dem Orchestrator uebergeben. Es gibt
//! keinen globalen Zustand: Verzeichnis, Kanal, Ereignis-Senke und
//! Transport-Fabrik leben genau so lange wie der Orchestrator.

use funklink_core::{EventSink, LokalerKanal, TransportFabrik, Verzeichnis};

pub struct ModulKontext {
    /// Verzeichnisdienst
    pub verzeichnis: Box<dyn Verzeichnis>,
    /// Lokaler Funkkanal
    pub kanal: Box<dyn LokalerKanal>,
    /// Ereignis-Senke der Skript-Ebene
    pub ereignisse: Box<dyn EventSink>,
    /// Erstellt Transporte fuer neue Sessions
    pub transporte: Box<dyn TransportFabrik>,
}

impl ModulKontext {
    pub fn neu(
        verzeichnis: Box<dyn Verzeichnis>,
        kanal: Box<dyn LokalerKanal>,
        ereignisse: Box<dyn EventSink>,
        transporte: Box<dyn TransportFabrik>,
    ) -> Self {
        Self {
            verzeichnis,
            kanal,
            ereignisse,
            transporte,
        }
    }
}

impl std::fmt::Debug for ModulKontext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModulKontext")
            .field("verzeichnis_status", &self.verzeichnis.status())
            .field("kanal_aktiv", &self.kanal.ist_aktiv())
            .finish_non_exhaustive()
    }
}
