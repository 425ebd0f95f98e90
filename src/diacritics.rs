//! Text helpers for Arabic diacritics and ALA-LC romanizations.

use unicode_normalization::UnicodeNormalization;

/// Arabic combining vowel signs and other harakat (U+064B–U+065F).
pub fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}')
}

/// True if the last character of `text` is an Arabic diacritic.
pub fn is_trailing_diacritic(text: &str) -> bool {
    text.chars().next_back().is_some_and(is_arabic_diacritic)
}

/// Remove one trailing diacritic, if present. Never recursive: `"بٌّ"` loses
/// only the final mark.
pub fn strip_trailing_diacritic(text: &str) -> &str {
    match text.char_indices().next_back() {
        Some((idx, ch)) if is_arabic_diacritic(ch) => &text[..idx],
        _ => text,
    }
}

/// Romanization characters and their ASCII spellings, in the style of the
/// Arabic chat alphabet. Applied in order.
const ROMANIZATION_TABLE: &[(&str, &str)] = &[
    ("ā", "aa"),
    ("ī", "ii"),
    ("ū", "uu"),
    ("ʾ", "2"),
    ("ʿ", "3"),
    ("ḍ", "D"),
    ("ḡ", "gh"),
    ("ḥ", "H"),
    ("ṣ", "S"),
    ("ṭ", "T"),
    ("ṯ", "th"),
    ("ẓ", "DH"),
];

/// Turn an ALA-LC style romanization into plain ASCII.
///
/// Characters with a table entry are replaced first; any other accented
/// letter is decomposed (NFKD) and loses its combining marks. Remaining
/// non-ASCII characters are dropped.
pub fn romanized_to_ascii(translit: &str) -> String {
    let mut text = translit.nfc().collect::<String>();
    for (from, to) in ROMANIZATION_TABLE {
        text = text.replace(from, to);
    }
    text.nfkd().filter(char::is_ascii).collect()
}
