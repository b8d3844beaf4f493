//! Abbrechbare Timer fuer den Orchestrator
//!
//! Ein Timer ist ein tokio-Task, der nach Ablauf ein `Eingang::Timer` in den
//! Eingangskanal legt. Jeder Start erhoeht die Generation. Abbrechen beendet
//! den Task; eine bereits eingereihte Meldung einer alten Generation wird
//! beim Verarbeiten ueber `abgelaufen` verworfen.

use std::time::Duration;

use funklink_core::{Eingang, TimerArt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Ein einzelner, neu startbarer Timer
#[derive(Debug)]
pub struct Zeitgeber {
    art: TimerArt,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Zeitgeber {
    pub fn neu(art: TimerArt) -> Self {
        Self {
            art,
            handle: None,
            generation: 0,
        }
    }

    /// Startet den Timer, ein laufender wird ersetzt
    pub fn starten(&mut self, dauer: Duration, tx: &mpsc::UnboundedSender<Eingang>) {
        self.abbrechen();
        let art = self.art;
        let generation = self.generation;
        let tx = tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(dauer).await;
            let _ = tx.send(Eingang::Timer { art, generation });
        }));
    }

    /// Bricht den Timer ab, alte Meldungen werden ungueltig
    pub fn abbrechen(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Laeuft der Timer?
    pub fn ist_aktiv(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Prueft ob eine Meldung zur aktuellen Generation gehoert
    ///
    /// Der Timer gilt danach als abgelaufen.
    pub fn abgelaufen(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.handle.is_none() {
            return false;
        }
        self.handle = None;
        true
    }
}

impl Drop for Zeitgeber {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
