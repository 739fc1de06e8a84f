//! Publisher name canonicalization
//!
//! Open Library publisher names are free text. This table folds the variants
//! seen in the book list onto one lowercase canonical name. Names not in the
//! table are kept as they are.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static PUBLISHER_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // HarperCollins
        ("harper collins", "harpercollins"),
        ("harper collins publishers", "harpercollins"),
        ("harper collins paperbacks", "harpercollins"),
        ("harper collins usa", "harpercollins"),
        ("harper collins/voyager", "harpercollins"),
        ("harper collins uk", "harpercollins"),
        ("harper collins publisher", "harpercollins"),
        ("harper collins.india", "harpercollins"),
        ("harper  collins", "harpercollins"),
        ("harper collins 0 pub", "harpercollins"),
        ("harperchildren's audio", "harpercollins"),
        ("harper children's audio", "harpercollins"),
        ("harpercollins publishers", "harpercollins"),
        ("harpercollins publishers limited", "harpercollins"),
        ("harpercollinschildrensbooks", "harpercollins"),
        ("harpercollins childrens books", "harpercollins"),
        ("harpercollins pub.", "harpercollins"),
        ("harpercollins pub ltd", "harpercollins"),
        ("harpercollins audio", "harpercollins"),
        ("harpercollins, publishers", "harpercollins"),
        // Voyager
        ("harper voyager harper collins publishers", "voyager"),
        ("voyager / harper collins", "voyager"),
        ("voyager / harpercollins", "voyager"),
        ("brand: harper voyager", "voyager"),
        ("livros da voyager (reino unido) e spectra (eua)", "voyager"),
        ("harper voyager", "voyager"),
        ("harpervoyager", "voyager"),
        // Random House
        ("random house uk ltd (a division of random house group)", "random house"),
        ("random house us", "random house"),
        ("random house export editions", "random house"),
        ("random house audio", "random house"),
        ("random house publishing group", "random house"),
        // Penguin
        ("penguin books", "penguin"),
        ("penguin books, limited", "penguin"),
        ("penguin books ltd", "penguin"),
        ("penguin adult hc/tr", "penguin"),
        ("penguin random house llc.", "penguin random house"),
        // Putnam
        ("putnam pub group", "putnam"),
        ("putnam adult", "putnam"),
        ("g.p. putnam's sons", "putnam"),
        // Berkley
        ("berkley pub. corp.", "berkley"),
        ("berkley pub. co. , distributed by putnam", "berkley"),
        ("berkley pub. corp. : distributed by putnam", "berkley"),
        ("berkley pub. co. : distributed by putnam", "berkley"),
        ("berkley publications", "berkley"),
        // Ballantine
        ("ballantine books", "ballantine"),
        ("ballantine del rey", "ballantine"),
        ("ballatine books", "ballantine"),
        // Del Rey
        ("del rey books", "del rey"),
        ("brand: del rey", "del rey"),
        // Orbit
        ("orbit science fiction", "orbit"),
        // Sidgwick & Jackson
        ("sidgwick and jackson", "sidgwick & jackson"),
        ("sidgwick & jackson ltd", "sidgwick & jackson"),
        ("sidg. & j", "sidgwick & jackson"),
    ]
    .into_iter()
    .collect()
});

/// Lowercase, trim and fold onto the canonical name
pub fn canonical_publisher(name: &str) -> String {
    let normalized = name.trim().to_lowercase();
    match PUBLISHER_SYNONYMS.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}
