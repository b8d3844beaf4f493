//! Schnittstelle zum lokalen Funkkanal
//!
//! Der lokale Kanal (Empfaenger, Sender, Squelch) gehoert der umgebenden
//! Logik. Das Modul muss ihn exklusiv anfordern bevor eine Gegenstation
//! angenommen werden darf.

/// Vertrag des lokalen Funkkanals
pub trait LokalerKanal: Send {
    /// Fordert den Kanal exklusiv an
    ///
    /// Gibt `false` zurueck wenn der Kanal mit etwas anderem beschaeftigt ist.
    fn aktivieren(&mut self) -> bool;

    /// Gibt den Kanal wieder frei
    fn deaktivieren(&mut self) -> bool;

    /// Haelt das Modul den Kanal gerade?
    fn ist_aktiv(&self) -> bool;

    /// Meldet ob das Modul im Leerlauf ist
    fn leerlauf_setzen(&mut self, leerlauf: bool);

    /// Tastet den lokalen Sender
    fn senden(&mut self, tasten: bool);

    /// Gibt dekodiertes Audio einer Gegenstation auf dem Sender aus
    fn audio_ausgeben(&mut self, samples: &[f32]);
}
