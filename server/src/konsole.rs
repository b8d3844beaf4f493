//! Bedienkonsole auf stdin
//!
//! Zeilenbasierte Befehle im Format `befehl key=wert key2="wert mit leer"`.
//! Damit lassen sich ohne Funkgeraet und ohne Gegenstationen alle Eingaenge
//! des Orchestrators ausloesen:
//!
//! ```text
//! dtmf cmd=2001#            Tastenfeld-Befehl
//! dtmf                      leerer Befehl (letzte Verbindung trennen)
//! verbinden call=DL1ABC     eingehende Verbindung (Adresse aus dem Verzeichnis)
//! squelch offen=1           Squelch des lokalen Empfaengers
//! sendet call=DL1ABC an=1   Gegenstation beginnt/beendet das Senden
//! chat call=DL1ABC text="Hallo"
//! trennt call=DL1ABC        Gegenstation legt auf
//! status | aktiviert | deaktiviert
//! ```

use std::collections::HashMap;
use std::net::IpAddr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KonsolenFehler {
    #[error("Leere Befehlszeile")]
    Leer,

    #[error("Unbekannter Befehl: {0}")]
    Unbekannt(String),

    #[error("Pflicht-Parameter fehlt: {0}")]
    ParameterFehlt(&'static str),

    #[error("Ungueltiger Wert fuer '{schluessel}': {wert}")]
    UngueltigerWert { schluessel: &'static str, wert: String },
}

pub type KonsolenResult<T> = Result<T, KonsolenFehler>;

/// Ein geparster Konsolenbefehl
#[derive(Debug, Clone, PartialEq)]
pub enum Konsolenbefehl {
    Dtmf(String),
    Eingehend {
        rufzeichen: String,
        name: String,
        adresse: Option<IpAddr>,
    },
    Squelch(bool),
    Sendet { rufzeichen: String, an: bool },
    Chat { rufzeichen: String, text: String },
    Trennt { rufzeichen: String },
    StatusBericht,
    Aktiviert,
    Deaktiviert,
}

struct Zeile {
    name: String,
    params: HashMap<String, String>,
}

impl Zeile {
    fn param(&self, schluessel: &str) -> Option<&str> {
        self.params.get(schluessel).map(|s| s.as_str())
    }

    fn pflicht(&self, schluessel: &'static str) -> KonsolenResult<&str> {
        self.param(schluessel)
            .ok_or(KonsolenFehler::ParameterFehlt(schluessel))
    }

    fn schalter(&self, schluessel: &'static str) -> KonsolenResult<bool> {
        match self.pflicht(schluessel)? {
            "1" | "ja" | "an" => Ok(true),
            "0" | "nein" | "aus" => Ok(false),
            wert => Err(KonsolenFehler::UngueltigerWert {
                schluessel,
                wert: wert.to_string(),
            }),
        }
    }
}

/// Parst eine Konsolenzeile
pub fn zeile_parsen(zeile: &str) -> KonsolenResult<Konsolenbefehl> {
    let zeile = zerlegen(zeile)?;

    let befehl = match zeile.name.as_str() {
        "dtmf" => {
            let cmd = zeile.param("cmd").unwrap_or_default();
            Konsolenbefehl::Dtmf(cmd.trim_end_matches('#').to_string())
        }
        "verbinden" => {
            let rufzeichen = zeile.pflicht("call")?.to_ascii_uppercase();
            let adresse = match zeile.param("ip") {
                Some(ip) => Some(ip.parse().map_err(|_| KonsolenFehler::UngueltigerWert {
                    schluessel: "ip",
                    wert: ip.to_string(),
                })?),
                None => None,
            };
            Konsolenbefehl::Eingehend {
                name: zeile.param("name").unwrap_or(&rufzeichen).to_string(),
                rufzeichen,
                adresse,
            }
        }
        "squelch" => Konsolenbefehl::Squelch(zeile.schalter("offen")?),
        "sendet" => Konsolenbefehl::Sendet {
            rufzeichen: zeile.pflicht("call")?.to_ascii_uppercase(),
            an: zeile.schalter("an")?,
        },
        "chat" => Konsolenbefehl::Chat {
            rufzeichen: zeile.pflicht("call")?.to_ascii_uppercase(),
            text: zeile.pflicht("text")?.to_string(),
        },
        "trennt" => Konsolenbefehl::Trennt {
            rufzeichen: zeile.pflicht("call")?.to_ascii_uppercase(),
        },
        "status" => Konsolenbefehl::StatusBericht,
        "aktiviert" => Konsolenbefehl::Aktiviert,
        "deaktiviert" => Konsolenbefehl::Deaktiviert,
        anderer => return Err(KonsolenFehler::Unbekannt(anderer.to_string())),
    };
    Ok(befehl)
}

fn zerlegen(zeile: &str) -> KonsolenResult<Zeile> {
    let tokens = tokenize(zeile.trim());
    let (name, rest) = tokens.split_first().ok_or(KonsolenFehler::Leer)?;

    let params = rest
        .iter()
        .filter_map(|token| token.split_once('='))
        .map(|(k, v)| (k.to_lowercase(), v.to_string()))
        .collect();

    Ok(Zeile {
        name: name.to_lowercase(),
        params,
    })
}

/// Zerlegt eine Zeile in Tokens, beachtet Anfuehrungszeichen
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut aktuell = String::new();
    let mut in_quotes = false;
    let mut zeichen = input.chars().peekable();

    while let Some(c) = zeichen.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !aktuell.is_empty() {
                    tokens.push(std::mem::take(&mut aktuell));
                }
            }
            '\\' => match zeichen.next() {
                Some('s') => aktuell.push(' '),
                Some(anderes) => aktuell.push(anderes),
                None => aktuell.push('\\'),
            },
            _ => aktuell.push(c),
        }
    }

    if !aktuell.is_empty() {
        tokens.push(aktuell);
    }
    tokens
}
