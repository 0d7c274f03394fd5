pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_customers.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_customers.sql")),
				"tables/002_teams.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_teams.sql")),
				"tables/003_employees.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_employees.sql")),
				"tables/004_tickets.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_tickets.sql")),
				"tables/005_ticket_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_ticket_messages.sql")),
				"tables/006_ticket_embeddings.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_ticket_embeddings.sql")),
				"tables/007_feedback.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_feedback.sql")),
				"tables/008_kb_articles.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_kb_articles.sql")),
				"tables/009_article_embeddings.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_article_embeddings.sql")),
				"tables/010_team_intents.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_team_intents.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
