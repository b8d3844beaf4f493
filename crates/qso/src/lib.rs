//! funklink-qso – Orchestrierung gleichzeitiger QSO-Sessions
//!
//! Verbindet den lokalen Funkkanal mit mehreren Gegenstationen im
//! verzeichnisbasierten VoIP-Netz:
//! - Zulassung eingehender Verbindungen (Regeln, Obergrenzen, Kanal)
//! - Sprecherrecht und Audio-Weiterleitung
//! - Connect by Call und Knoten-ID-Aufloesung
//!
//! Einstiegspunkt ist der `QsoOrchestrator`. Alle externen Kollaborateure
//! kommen ueber den `ModulKontext` herein.

pub mod call_code;
pub mod command;
pub mod config;
pub mod error;
pub mod floor;
pub mod kontext;
pub mod netz;
pub mod node_id;
pub mod orchestrator;
pub mod policy;
pub mod registry;
pub mod session;
pub mod status;
pub mod timer;

pub use call_code::{CallCodeResolver, CbcAktion, CbcZustand};
pub use command::{befehl_parsen, Befehl, ZufallsZiel};
pub use config::{ModulEinstellungen, ModulKonfig};
pub use error::{QsoError, QsoResult};
pub use floor::{FloorArbiter, FloorHalter, FloorWechsel};
pub use kontext::ModulKontext;
pub use netz::VertrauensNetz;
pub use node_id::{Aufloesung, NodeIdResolver};
pub use orchestrator::QsoOrchestrator;
pub use policy::{AccessPolicy, Zugang};
pub use registry::QsoRegistry;
pub use session::Qso;
pub use timer::Zeitgeber;
