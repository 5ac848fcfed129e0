//! Cache-key normalization for city queries.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold `text` to a diacritic-free, lower-case key.
///
/// "São Paulo", "SAO PAULO" and "sao paulo" all map to the same key. The
/// result is only used for cache lookups; queries go to the server as typed.
pub fn normalize(text: &str) -> String {
    // Case is folded before decomposition: some lower-case forms
    // (e.g. of 'İ') introduce combining marks of their own.
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
