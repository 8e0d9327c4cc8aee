pub fn render_schema() -> String {
	let mut out = String::new();

	for table in [
		include_str!("../../../sql/tables/001_links.sql"),
		include_str!("../../../sql/tables/002_tags.sql"),
		include_str!("../../../sql/tables/003_link_tags.sql"),
		include_str!("../../../sql/tables/004_change_log.sql"),
		include_str!("../../../sql/tables/005_index_state.sql"),
		include_str!("../../../sql/tables/006_history_meta.sql"),
	] {
		out.push_str(table);
		out.push('\n');
	}

	out
}
