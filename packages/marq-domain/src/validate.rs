use url::Url;

pub const MAX_TITLE_CHARS: usize = 512;
pub const MAX_NOTE_CHARS: usize = 4_096;
pub const MAX_TAG_CHARS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectCode {
	RejectEmptyTitle,
	RejectTitleTooLong,
	RejectNoteTooLong,
	RejectInvalidUrl,
	RejectEmptyTag,
	RejectTagTooLong,
}

pub fn link_title(title: &str) -> Result<(), RejectCode> {
	let trimmed = title.trim();

	if trimmed.is_empty() {
		return Err(RejectCode::RejectEmptyTitle);
	}
	if trimmed.chars().count() > MAX_TITLE_CHARS {
		return Err(RejectCode::RejectTitleTooLong);
	}

	Ok(())
}

pub fn link_note(note: &str) -> Result<(), RejectCode> {
	if note.chars().count() > MAX_NOTE_CHARS {
		return Err(RejectCode::RejectNoteTooLong);
	}

	Ok(())
}

pub fn link_url(raw: &str) -> Result<Url, RejectCode> {
	Url::parse(raw.trim()).map_err(|_| RejectCode::RejectInvalidUrl)
}

pub fn tag_name(name: &str) -> Result<(), RejectCode> {
	let trimmed = name.trim();

	if trimmed.is_empty() {
		return Err(RejectCode::RejectEmptyTag);
	}
	if trimmed.chars().count() > MAX_TAG_CHARS {
		return Err(RejectCode::RejectTagTooLong);
	}

	Ok(())
}
