/// True when the search input selects "everything" rather than filtering.
pub fn is_blank(text: &str) -> bool {
	text.trim().is_empty()
}

/// Escapes backslashes and double quotes so user input can be embedded in a
/// quoted match expression without terminating or corrupting it.
pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars() {
		if matches!(ch, '\\' | '"') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
