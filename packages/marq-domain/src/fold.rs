use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Case- and diacritic-insensitive form of `text`, used both when indexing a
/// title and when matching a query against it. Decomposes, drops combining
/// marks, and lowercases, so "Café" and "cafe" fold to the same string.
pub fn fold(text: &str) -> String {
	text.nfkd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}
