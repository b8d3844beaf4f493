//! Sprecherrecht (Floor) – wer darf gerade senden?
//!
//! Das Sprecherrecht liegt bei hoechstens einer Partei:
//! - beim lokalen Empfaenger, solange dessen Squelch offen ist
//! - sonst bei einer Session (dem "Sprecher")
//! - sonst bei niemandem
//!
//! Die erste Session, die zu senden beginnt waehrend niemand spricht, wird
//! Sprecher. Hoert der Sprecher auf oder trennt, geht das Recht an die Session, die
//! von den noch sendenden am fruehesten angefangen hat.
//!
//! Der Arbiter haelt nur die ID des Sprechers. Die Sende-Status selbst
//! liegen in den Sessions der Registry.

use funklink_core::QsoId;

use crate::registry::QsoRegistry;

/// Aktueller Inhaber des Sprecherrechts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorHalter {
    /// Niemand spricht
    Niemand,
    /// Lokaler Empfaenger (Squelch offen)
    Lokal,
    /// Eine Gegenstation
    Qso(QsoId),
}

/// Folgen einer Empfangs-Aenderung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloorWechsel {
    /// Lokalen Sender tasten (`Some(true)`) oder freigeben (`Some(false)`)
    pub tasten: Option<bool>,
    /// Teilnehmerliste muss neu verteilt werden
    pub status_senden: bool,
}

/// Vergibt das Sprecherrecht und entscheidet ueber Audio-Weiterleitung
#[derive(Debug, Default)]
pub struct FloorArbiter {
    sprecher: Option<QsoId>,
    squelch_offen: bool,
    /// Laufende Nummer fuer Sendebeginne
    laufnummer: u64,
}

impl FloorArbiter {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Aktueller Sprecher unter den Sessions (unabhaengig vom Squelch)
    pub fn sprecher(&self) -> Option<QsoId> {
        self.sprecher
    }

    pub fn squelch_offen(&self) -> bool {
        self.squelch_offen
    }

    /// Wer haelt gerade das Sprecherrecht?
    pub fn halter(&self) -> FloorHalter {
        if self.squelch_offen {
            FloorHalter::Lokal
        } else if let Some(id) = self.sprecher {
            FloorHalter::Qso(id)
        } else {
            FloorHalter::Niemand
        }
    }

    /// Squelch des lokalen Empfaengers
    pub fn squelch_setzen(&mut self, offen: bool) {
        self.squelch_offen = offen;
    }

    /// Eine Session beginnt oder beendet das Senden
    ///
    /// Aktualisiert den Sende-Status in der Registry und vergibt das
    /// Sprecherrecht neu. Unbekannte oder getrennte Sessions werden
    /// ignoriert.
    pub fn empfang_geaendert(
        &mut self,
        registry: &mut QsoRegistry,
        id: QsoId,
        empfaengt: bool,
    ) -> FloorWechsel {
        self.laufnummer += 1;
        match registry.get_mut(id) {
            Some(qso) if !qso.ist_getrennt() => qso.empfang_setzen(empfaengt, self.laufnummer),
            _ => return FloorWechsel::default(),
        }

        let mut wechsel = FloorWechsel::default();

        if self.sprecher.is_none() && empfaengt {
            tracing::debug!(qso = %id, "Sprecherrecht vergeben");
            self.sprecher = Some(id);
            wechsel.status_senden = true;
        }

        if self.sprecher == Some(id) {
            let mut tasten = empfaengt;
            if !empfaengt {
                self.sprecher = Self::erster_sprecher(registry);
                tracing::debug!(qso = %id, neu = ?self.sprecher, "Sprecherrecht freigegeben");
                tasten = self.sprecher.is_some();
                wechsel.status_senden = true;
            }
            wechsel.tasten = Some(tasten);
        }

        wechsel
    }

    /// Eine Session wurde getrennt oder aus der Registry entfernt
    ///
    /// War sie Sprecher, wird das Recht neu vergeben und der neue
    /// Sender-Zustand zurueckgegeben. Getrennte Sessions zaehlen dabei
    /// nicht mehr als Sender.
    pub fn qso_abgegangen(&mut self, registry: &QsoRegistry, id: QsoId) -> Option<bool> {
        if self.sprecher != Some(id) {
            return None;
        }
        self.sprecher = Self::erster_sprecher(registry);
        Some(self.sprecher.is_some())
    }

    /// Darf Audio dieser Session auf den lokalen Sender?
    pub fn zum_lokalen_kanal(&self, id: QsoId) -> bool {
        self.sprecher == Some(id) && !self.squelch_offen
    }

    /// Darf rohes Audio dieser Session an die anderen Sessions gehen?
    pub fn an_andere_weiterleiten(&self, id: QsoId) -> bool {
        self.zum_lokalen_kanal(id)
    }

    /// Session, die von allen noch sendenden am fruehesten angefangen hat
    pub fn erster_sprecher(registry: &QsoRegistry) -> Option<QsoId> {
        registry
            .iter()
            .filter(|q| !q.ist_getrennt() && q.empfaengt())
            .filter_map(|q| q.empfang_seit().map(|seit| (seit, q.id())))
            .min_by_key(|(seit, _)| *seit)
            .map(|(_, id)| id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
