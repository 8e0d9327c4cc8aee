use marq_domain::validate::{self, RejectCode};

#[test]
fn accepts_a_plain_link() {
	assert!(validate::link_title("Rust Blog").is_ok());
	assert!(validate::link_note("worth rereading").is_ok());

	let url = validate::link_url("https://blog.rust-lang.org/").expect("Expected a valid URL.");

	assert_eq!(url.scheme(), "https");
}

#[test]
fn rejects_empty_and_oversized_titles() {
	assert_eq!(validate::link_title("   "), Err(RejectCode::RejectEmptyTitle));

	let long = "x".repeat(validate::MAX_TITLE_CHARS + 1);

	assert_eq!(validate::link_title(&long), Err(RejectCode::RejectTitleTooLong));
}

#[test]
fn rejects_relative_urls() {
	assert_eq!(validate::link_url("not a url"), Err(RejectCode::RejectInvalidUrl));
	assert_eq!(validate::link_url("/relative/path"), Err(RejectCode::RejectInvalidUrl));
}

#[test]
fn rejects_bad_tag_names() {
	assert_eq!(validate::tag_name(""), Err(RejectCode::RejectEmptyTag));

	let long = "t".repeat(validate::MAX_TAG_CHARS + 1);

	assert_eq!(validate::tag_name(&long), Err(RejectCode::RejectTagTooLong));
	assert!(validate::tag_name("reading-list").is_ok());
}
