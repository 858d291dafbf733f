//! Lookup-key normalization for user-supplied names
//!
//! Province, company, fuel and river names are matched after lowercasing,
//! dropping diacritics and treating `-` as a space, so `"Entre-Ríos"` finds
//! `"entre rios"`.

/// Normalizes a name for comparison
pub fn normalize_key(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| if c == '-' { ' ' } else { c })
        .collect()
}

/// Strips the diacritic from a lowercase Latin letter
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}
