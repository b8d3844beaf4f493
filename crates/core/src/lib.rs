//! funklink-core – Gemeinsame Typen, Ereignisse und Kollaborateur-Traits
//!
//! Dieses Crate stellt die Bausteine bereit, die zwischen der
//! QSO-Orchestrierung (`funklink-qso`) und ihren externen Kollaborateuren
//! geteilt werden: Verzeichnisdienst, lokaler Funkkanal, QSO-Transport und
//! die Ereignis-Senke fuer die Skript-Ebene.

pub mod channel;
pub mod directory;
pub mod eingang;
pub mod error;
pub mod event;
pub mod station;
pub mod transport;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use channel::LokalerKanal;
pub use directory::Verzeichnis;
pub use eingang::{Eingang, TimerArt};
pub use error::{FunklinkError, Result};
pub use event::{EventSink, ModulEvent};
pub use station::{StationData, StationListe, StationStatus, StationsTyp};
pub use transport::{QsoEreignis, QsoEreignisSender, QsoTransport, QsoZustand, TransportFabrik};
pub use types::{NodeId, QsoId};
