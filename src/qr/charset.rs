//! Permitted character set for payload text fields.
//!
//! The payment standard restricts every text element to a Latin subset:
//! the printable ASCII range plus a fixed list of Latin-1 letters and
//! symbols. Anything else — curly quotes, em-dashes, emoji, characters
//! from other scripts — must be rejected by the assembler, never
//! transliterated.

use crate::core::ZahlteilError;

/// Latin-1 characters permitted beyond printable ASCII.
/// Sorted by code point for binary search.
static LATIN_EXTRAS: &[char] = &[
    '£', '´', 'À', 'Á', 'Â', 'Ä', 'Ç', 'È', 'É', 'Ê', 'Ë', 'Ì', 'Í', 'Î', 'Ï', 'Ñ', 'Ò', 'Ó',
    'Ô', 'Ö', 'Ù', 'Ú', 'Û', 'Ü', 'Ý', 'ß', 'à', 'á', 'â', 'ä', 'ç', 'è', 'é', 'ê', 'ë', 'ì',
    'í', 'î', 'ï', 'ñ', 'ò', 'ó', 'ô', 'ö', '÷', 'ù', 'ú', 'û', 'ü', 'ý',
];

/// Whether a single character belongs to the permitted set.
pub fn is_permitted(c: char) -> bool {
    matches!(c, ' '..='~') || LATIN_EXTRAS.binary_search(&c).is_ok()
}

/// Check every character of a field value, naming the field and the first
/// offending character on failure.
pub(crate) fn ensure_permitted(field: &str, value: &str) -> Result<(), ZahlteilError> {
    match value.chars().find(|c| !is_permitted(*c)) {
        None => Ok(()),
        Some(character) => Err(ZahlteilError::UnsupportedCharacter {
            field: field.to_string(),
            character,
        }),
    }
}
