//! Connect by Call – Verbindung ueber den Tastenfeld-Code eines Rufzeichens
//!
//! Ablauf:
//! 1. `*<code>` (oder `*<code>*` fuer Praefixsuche) sucht im Verzeichnis
//! 2. 1..=9 Treffer werden als nummerierte Liste angesagt
//! 3. Die naechste Eingabe waehlt aus: leer = Abbruch, `0` = Liste erneut,
//!    `N` = Verbindung zum N-ten Kandidaten
//! 4. Ohne Eingabe innerhalb der Frist: Zeitablauf
//!
//! ```text
//! Leerlauf --(1..=9 Treffer)--> AuswahlErwartet
//!    ^                               |
//!    +-- Abbruch / Auswahl / Zeitablauf
//! ```
//!
//! Solange eine Auswahl erwartet wird, bekommt der Resolver jede Eingabe
//! vor der normalen Befehlsverarbeitung.

use std::time::Duration;

use funklink_core::{Eingang, ModulEvent, StationData, TimerArt, Verzeichnis};
use tokio::sync::mpsc;

use crate::timer::Zeitgeber;

/// Minimale Befehlslaenge inklusive fuehrendem `*`
const MIN_BEFEHL_LAENGE: usize = 4;

/// Maximale Anzahl ansagbarer Kandidaten
const MAX_KANDIDATEN: usize = 9;

/// Zustand des Resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CbcZustand {
    Leerlauf,
    AuswahlErwartet,
}

/// Was der Orchestrator als naechstes tun soll
#[derive(Debug, Clone, PartialEq)]
pub enum CbcAktion {
    /// Ereignis an die Skript-Ebene melden
    Melden(ModulEvent),
    /// Ausgehende Verbindung zur Station aufbauen
    Verbinden(StationData),
}

/// Zustandsmaschine fuer Connect by Call
#[derive(Debug)]
pub struct CallCodeResolver {
    zustand: CbcZustand,
    kandidaten: Vec<StationData>,
    timer: Zeitgeber,
    frist: Duration,
}

impl CallCodeResolver {
    pub fn neu(frist: Duration) -> Self {
        Self {
            zustand: CbcZustand::Leerlauf,
            kandidaten: Vec::new(),
            timer: Zeitgeber::neu(TimerArt::CallCode),
            frist,
        }
    }

    pub fn zustand(&self) -> CbcZustand {
        self.zustand
    }

    /// Wird gerade eine Auswahl erwartet?
    pub fn ist_aktiv(&self) -> bool {
        self.zustand == CbcZustand::AuswahlErwartet
    }

    pub fn kandidaten(&self) -> &[StationData] {
        &self.kandidaten
    }

    /// Startet eine Suche fuer einen `*`-Befehl
    pub fn suche_starten(
        &mut self,
        befehl: &str,
        verzeichnis: &dyn Verzeichnis,
        tx: &mpsc::UnboundedSender<Eingang>,
    ) -> CbcAktion {
        if befehl.len() < MIN_BEFEHL_LAENGE {
            return CbcAktion::Melden(ModulEvent::CbcTooShortCmd(befehl.to_string()));
        }

        let ohne_stern = befehl.strip_prefix('*').unwrap_or(befehl);
        let (code, exakt) = match ohne_stern.strip_suffix('*') {
            Some(praefix) => (praefix, false),
            None => (ohne_stern, true),
        };

        let treffer = verzeichnis.nach_code(code, exakt);
        tracing::info!(code, exakt, treffer = treffer.len(), "Rufzeichen-Code gesucht");

        if treffer.is_empty() {
            return CbcAktion::Melden(ModulEvent::CbcNoMatch(code.to_string()));
        }
        if treffer.len() > MAX_KANDIDATEN {
            return CbcAktion::Melden(ModulEvent::CbcTooManyMatches);
        }

        self.kandidaten = treffer;
        self.zustand = CbcZustand::AuswahlErwartet;
        self.timer.starten(self.frist, tx);
        CbcAktion::Melden(self.liste())
    }

    /// Verarbeitet die Eingabe waehrend eine Auswahl erwartet wird
    pub fn auswahl(&mut self, eingabe: &str, tx: &mpsc::UnboundedSender<Eingang>) -> CbcAktion {
        if eingabe.is_empty() {
            self.zuruecksetzen();
            return CbcAktion::Melden(ModulEvent::CbcAborted);
        }

        let index = fuehrende_zahl(eingabe);

        if index == 0 {
            self.timer.starten(self.frist, tx);
            return CbcAktion::Melden(self.liste());
        }

        match self.kandidaten.get(index as usize - 1).cloned() {
            Some(station) => {
                self.zuruecksetzen();
                CbcAktion::Verbinden(station)
            }
            None => {
                self.timer.starten(self.frist, tx);
                CbcAktion::Melden(ModulEvent::CbcIndexOutOfRange(index))
            }
        }
    }

    /// Verarbeitet eine abgelaufene Frist
    ///
    /// Gibt `None` zurueck wenn die Meldung veraltet ist.
    pub fn zeitablauf(&mut self, generation: u64) -> Option<ModulEvent> {
        if !self.timer.abgelaufen(generation) || !self.ist_aktiv() {
            return None;
        }
        tracing::info!("Connect by Call: Zeitablauf");
        self.zuruecksetzen();
        Some(ModulEvent::CbcTimeout)
    }

    /// Zurueck in den Leerlauf, Kandidaten und Timer verwerfen
    pub fn zuruecksetzen(&mut self) {
        self.timer.abbrechen();
        self.kandidaten.clear();
        self.zustand = CbcZustand::Leerlauf;
    }

    fn liste(&self) -> ModulEvent {
        ModulEvent::CbcList(self.kandidaten.iter().map(|s| s.rufzeichen.clone()).collect())
    }
}

/// Liest die fuehrenden Ziffern einer Eingabe (keine Ziffer = 0)
fn fuehrende_zahl(eingabe: &str) -> u32 {
    let ziffern: String = eingabe.chars().take_while(|c| c.is_ascii_digit()).collect();
    ziffern.parse().unwrap_or(0)
}
