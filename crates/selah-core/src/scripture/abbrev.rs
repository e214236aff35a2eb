//! Book abbreviation normalization
//!
//! The snapshot stores one lowercase ASCII abbreviation per book, but user
//! input and older corpus exports disagree with those keys in two ways:
//! accented forms (`jó`, `êx`) and longer aliases (`atos`, `sal`). A fixed
//! remap table resolves the known mismatches before lookup.
//!
//! Fallback rule: anything not in the table is returned trimmed and
//! lowercased, unchanged. The function is total and always terminates.

/// Known aliases and accented forms, mapped to the snapshot's stored key.
///
/// Note the homograph pair: `jó` (Jó / Job) maps to `job`, while the bare
/// `jo` is João (John) and must pass through untouched.
const REMAP: &[(&str, &str)] = &[
    ("gên", "gn"),  // Gênesis
    ("gen", "gn"),  // Gênesis, accent stripped
    ("êx", "ex"),   // Êxodo
    ("êxo", "ex"),  // Êxodo
    ("jó", "job"),  // Jó (Job); "jo" is João
    ("sal", "sl"),  // Salmos
    ("prov", "pv"), // Provérbios
    ("ecl", "ec"),  // Eclesiastes
    ("cânt", "ct"), // Cânticos
    ("cant", "ct"), // Cânticos, accent stripped
    ("isa", "is"),  // Isaías
    ("hab", "hc"),  // Habacuque
    ("atos", "at"), // Atos
    ("heb", "hb"),  // Hebreus
];

/// Normalize a book abbreviation to the snapshot's lookup key.
pub fn normalize(raw: &str) -> String {
    let key = raw.trim().to_lowercase();

    for (alias, stored) in REMAP {
        if key == *alias {
            return (*stored).to_string();
        }
    }

    key
}
