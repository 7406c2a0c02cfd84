//! Translation of the admin interface texts
//!
//! The catalog is keyed by the English source text. Unknown locales and missing entries fall back
//! to the key itself, so English never needs a catalog of its own.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref CATALOG: HashMap<&'static str, HashMap<&'static str, &'static str>> = {
        let mut catalog = HashMap::new();
        catalog.insert("de", GERMAN.iter().copied().collect());
        catalog
    };
}

const GERMAN: &[(&str, &str)] = &[
    (
        "An event has been detected. This configuration may be overridden by the event.",
        "Ein Ereignis wurde erkannt. Diese Konfiguration kann durch das Ereignis überschrieben werden.",
    ),
    (
        "Banner content for logged-in users (HTML)",
        "Bannerinhalt für angemeldete Benutzer (HTML)",
    ),
    (
        "Banner content for visitors / logged-out users (HTML)",
        "Bannerinhalte für Besucher / abgemeldete Benutzer (HTML)",
    ),
    ("Close button", "Schaltfläche „Schließen“"),
    ("Enabled", "Aktiv"),
    (
        "Examples of CSS values that can be overwritten:",
        "Beispiele für CSS-Werte, die überschrieben werden können:",
    ),
    (
        "If the content is empty, the banner will not be displayed.",
        "Wenn der Inhalt leer ist, wird das Banner nicht angezeigt.",
    ),
    ("Style", "Stil"),
    ("Info", "Info"),
    ("Success", "Erfolg"),
    ("Warning", "Warnung"),
    ("Danger", "Gefahr"),
    ("Banner Type", "Banner-Typ"),
    ("Manual", "Manuell"),
    ("Weather alert", "Wetterwarnung"),
    ("Safety notice", "Sicherheitshinweis"),
    ("Harbor update", "Hafen-Neuigkeiten"),
    ("Event announcement", "Veranstaltungshinweis"),
    ("Maintenance window", "Wartungsfenster"),
    ("Banner configuration", "Banner-Konfiguration"),
    ("Save", "Speichern"),
    ("The configuration has been saved.", "Die Konfiguration wurde gespeichert."),
    (
        "The submitted data is invalid. Please check the marked fields.",
        "Eingegebene Daten sind ungültig. Bitte markierte Felder überprüfen.",
    ),
    (
        "Could not save due to concurrent database access. Please submit the form again.",
        "Konnte wegen parallelem Datenbank-Zugriff nicht speichern. Bitte Formular erneut absenden.",
    ),
    ("Must be a boolean value.", "Muss ein Wahrheitswert sein."),
    (
        "Style must be one of info, success, warning or danger.",
        "Der Stil muss info, success, warning oder danger sein.",
    ),
    ("Banner Type is invalid.", "Der Banner-Typ ist ungültig."),
    (
        "Only used for the banner type \"Manual\". Other types show their built-in content.",
        "Wird nur für den Banner-Typ „Manuell“ verwendet. Andere Typen zeigen ihren eingebauten Inhalt.",
    ),
    (
        "No built-in content available for this type.",
        "Für diesen Typ ist kein eingebauter Inhalt verfügbar.",
    ),
    ("Error", "Fehler"),
];

/// Translate an English source text into the given locale.
///
/// The locale may be given with region (`de_DE`, `de-AT`); only the language part is used.
pub fn translate<'a>(key: &'a str, locale: &str) -> &'a str {
    let language = locale
        .split(['_', '-'])
        .next()
        .unwrap_or(locale)
        .to_lowercase();
    CATALOG
        .get(language.as_str())
        .and_then(|entries| entries.get(key))
        .copied()
        .unwrap_or(key)
}
