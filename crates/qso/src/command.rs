//! Befehlsparser fuer Tastenfeld-Befehle
//!
//! Ein Befehl ist eine Ziffernfolge ohne abschliessendes `#`:
//!
//! | Eingabe        | Bedeutung                                      |
//! |----------------|------------------------------------------------|
//! | (leer)         | letzte Verbindung trennen bzw. Modul beenden   |
//! | `*<code>[*]`   | Connect by Call                                |
//! | `0`            | Hilfe                                          |
//! | `1`            | verbundene Stationen ansagen                   |
//! | `2`            | eigene Knoten-ID ansagen                       |
//! | `31` / `32`    | Zufallsverbindung Link/Repeater bzw. Konferenz |
//! | `4`            | letzte getrennte Station neu verbinden         |
//! | `5x`           | Nur-Hoeren aus (`x = 0`) bzw. an               |
//! | 4+ Ziffern     | Verbindung ueber Knoten-ID                     |

use funklink_core::NodeId;

/// Befehle kuerzer als diese Laenge sind Kurzbefehle
const KURZBEFEHL_GRENZE: usize = 4;

/// Ziel einer Zufallsverbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZufallsZiel {
    /// Links und Repeater
    LinkOderRepeater,
    /// Konferenzserver
    Konferenz,
}

/// Ein geparster Tastenfeld-Befehl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Befehl {
    /// Leere Eingabe
    Trennen,
    /// Connect by Call, der komplette Befehl inklusive `*`
    ConnectByCall(String),
    Hilfe,
    ListeVerbunden,
    EigeneId,
    Zufall(ZufallsZiel),
    Wiederverbinden,
    NurHoeren(bool),
    /// Verbindung ueber Knoten-ID
    Verbinden(NodeId),
    /// Bekanntes Kommando mit ungueltigen Argumenten
    Fehlgeschlagen(String),
    Unbekannt(String),
}

/// Parst einen Tastenfeld-Befehl
pub fn befehl_parsen(eingabe: &str) -> Befehl {
    if eingabe.is_empty() {
        return Befehl::Trennen;
    }
    if eingabe.starts_with('*') {
        return Befehl::ConnectByCall(eingabe.to_string());
    }
    if eingabe.len() < KURZBEFEHL_GRENZE {
        return kurzbefehl_parsen(eingabe);
    }

    match eingabe.parse::<u32>() {
        Ok(id) => Befehl::Verbinden(NodeId(id)),
        Err(_) => Befehl::Fehlgeschlagen(eingabe.to_string()),
    }
}

fn kurzbefehl_parsen(eingabe: &str) -> Befehl {
    let fehlgeschlagen = || Befehl::Fehlgeschlagen(eingabe.to_string());
    let mut zeichen = eingabe.chars();
    let kopf = zeichen.next();
    let rest = zeichen.as_str();

    match kopf {
        Some('0') => Befehl::Hilfe,
        Some('1') if rest.is_empty() => Befehl::ListeVerbunden,
        Some('2') if rest.is_empty() => Befehl::EigeneId,
        Some('3') => match rest {
            "1" => Befehl::Zufall(ZufallsZiel::LinkOderRepeater),
            "2" => Befehl::Zufall(ZufallsZiel::Konferenz),
            _ => fehlgeschlagen(),
        },
        Some('4') if rest.is_empty() => Befehl::Wiederverbinden,
        Some('5') => match rest.chars().next() {
            Some(x) => Befehl::NurHoeren(x != '0'),
            None => fehlgeschlagen(),
        },
        Some('1' | '2' | '4') => fehlgeschlagen(),
        _ => Befehl::Unbekannt(eingabe.to_string()),
    }
}
