//! Zugangsregeln – Drop / Reject / Accept fuer eingehende Rufzeichen
//!
//! Drei unabhaengige Muster werden beim Start kompiliert und danach nur
//! noch ausgewertet. Die Muster gelten fuer das ganze Rufzeichen
//! (verankert) und ignorieren Gross-/Kleinschreibung.
//!
//! ## Vorrang
//! 1. `drop` passt -> `Zugang::Verwerfen` (keine Session, keine Meldung)
//! 2. `reject` passt oder `accept` passt nicht -> `Zugang::Ablehnen`
//! 3. sonst -> `Zugang::Annehmen`
//!
//! Ohne Konfiguration: nichts verwerfen, nichts ablehnen, alles annehmen.

use regex::{Regex, RegexBuilder};

use crate::error::{QsoError, QsoResult};

/// Ergebnis der Zugangspruefung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zugang {
    /// Still ignorieren
    Verwerfen,
    /// Session erstellen und mit Hinweis schliessen
    Ablehnen,
    /// Zulassen
    Annehmen,
}

/// Kompilierte Zugangsregeln
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    drop: Option<Regex>,
    reject: Option<Regex>,
    accept: Option<Regex>,
}

impl AccessPolicy {
    /// Kompiliert die drei Regeln
    ///
    /// `None` oder ein leerer String bedeutet "Regel nicht gesetzt".
    pub fn neu(
        drop: Option<&str>,
        reject: Option<&str>,
        accept: Option<&str>,
    ) -> QsoResult<Self> {
        Ok(Self {
            drop: muster_kompilieren("DROP", drop)?,
            reject: muster_kompilieren("REJECT", reject)?,
            accept: muster_kompilieren("ACCEPT", accept)?,
        })
    }

    /// Wertet die Regeln fuer ein Rufzeichen aus
    pub fn pruefen(&self, rufzeichen: &str) -> Zugang {
        if passt(&self.drop, rufzeichen) {
            return Zugang::Verwerfen;
        }

        let abgelehnt = passt(&self.reject, rufzeichen);
        let angenommen = match &self.accept {
            Some(re) => re.is_match(rufzeichen),
            None => true,
        };

        if abgelehnt || !angenommen {
            Zugang::Ablehnen
        } else {
            Zugang::Annehmen
        }
    }
}

fn passt(regel: &Option<Regex>, rufzeichen: &str) -> bool {
    regel.as_ref().is_some_and(|re| re.is_match(rufzeichen))
}

fn muster_kompilieren(regel: &'static str, muster: Option<&str>) -> QsoResult<Option<Regex>> {
    let muster = match muster {
        Some(m) if !m.is_empty() => m,
        _ => return Ok(None),
    };

    RegexBuilder::new(&format!("^(?:{muster})$"))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| QsoError::UngueltigesMuster {
            regel,
            grund: e.to_string(),
        })
}
