//! Vertrauenswuerdiges Netz (ALLOW_IP)
//!
//! Verbindungen aus diesem Adressbereich werden ohne Verzeichnis-Abgleich
//! zugelassen, z.B. fuer Stationen im eigenen LAN. Format: `addr/praefix`
//! (IPv4 oder IPv6), eine Adresse ohne Praefix gilt als Einzeladresse.

use std::net::IpAddr;
use std::str::FromStr;

use crate::error::QsoError;

/// Ein Adressbereich in CIDR-Schreibweise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertrauensNetz {
    basis: IpAddr,
    praefix: u8,
}

impl VertrauensNetz {
    /// Prueft ob eine Adresse im Bereich liegt
    ///
    /// Adressen unterschiedlicher Familie liegen nie im Bereich.
    pub fn enthaelt(&self, adresse: &IpAddr) -> bool {
        match (self.basis, adresse) {
            (IpAddr::V4(basis), IpAddr::V4(adr)) => {
                let maske = maske_u32(self.praefix);
                u32::from(basis) & maske == u32::from(*adr) & maske
            }
            (IpAddr::V6(basis), IpAddr::V6(adr)) => {
                let maske = maske_u128(self.praefix);
                u128::from(basis) & maske == u128::from(*adr) & maske
            }
            _ => false,
        }
    }
}

fn maske_u32(praefix: u8) -> u32 {
    if praefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(praefix))
    }
}

fn maske_u128(praefix: u8) -> u128 {
    if praefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(praefix))
    }
}

impl FromStr for VertrauensNetz {
    type Err = QsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (adresse, praefix) = match s.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (s, None),
        };

        let basis: IpAddr = adresse
            .parse()
            .map_err(|_| QsoError::UngueltigesNetz(format!("'{s}': Adresse nicht lesbar")))?;

        let max = if basis.is_ipv4() { 32 } else { 128 };
        let praefix = match praefix {
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= max)
                .ok_or_else(|| QsoError::UngueltigesNetz(format!("'{s}': Praefix ungueltig")))?,
            None => max,
        };

        Ok(Self { basis, praefix })
    }
}

impl std::fmt::Display for VertrauensNetz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.basis, self.praefix)
    }
}
