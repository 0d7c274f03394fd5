use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use porter_storage::{models::KbArticle, queries};

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateArticleRequest {
	pub ticket_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateArticleResponse {
	pub article_id: Uuid,
	pub title: String,
	pub created: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedArticle {
	title: String,
	body: String,
	#[serde(default)]
	tags: Vec<String>,
}

impl PorterService {
	/// Turns a settled ticket's conversation into a knowledge-base
	/// article. When a near-identical article already exists, it is
	/// returned instead of storing a duplicate.
	pub async fn generate_article(
		&self,
		req: GenerateArticleRequest,
	) -> Result<GenerateArticleResponse> {
		let now = OffsetDateTime::now_utc();
		let ticket = queries::fetch_ticket(&self.db.pool, req.ticket_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Ticket not found.".to_string() })?;

		if !crate::stored_status(&ticket)?.is_settled() {
			return Err(Error::Conflict {
				message: "Articles can only be generated from resolved or closed tickets."
					.to_string(),
			});
		}

		let messages = queries::fetch_ticket_messages(&self.db.pool, ticket.ticket_id).await?;

		if messages.is_empty() {
			return Err(Error::Conflict {
				message: "Ticket has no conversation to summarize.".to_string(),
			});
		}

		let transcript = messages
			.iter()
			.map(|message| format!("{}: {}", message.sender_kind, message.body))
			.collect::<Vec<_>>()
			.join("\n");
		let prompt = article_prompt(&ticket.subject, &transcript);
		let value =
			self.providers.generation.complete_json(&self.cfg.providers.generation, &prompt).await?;
		let article: GeneratedArticle =
			serde_json::from_value(value).map_err(|err| Error::Provider {
				message: format!("Generation returned an unexpected article shape: {err}."),
			})?;
		let title = article.title.trim().to_string();
		let body = article.body.trim().to_string();

		if title.is_empty() || body.is_empty() {
			return Err(Error::Provider {
				message: "Generation returned an empty article.".to_string(),
			});
		}

		let vector = self.embed_one(&format!("{title}\n\n{body}")).await?;

		if let Some(nearest) = queries::similar_articles(&self.db.pool, &vector, 1)
			.await?
			.into_iter()
			.next() && nearest.score as f32 >= self.cfg.kb.dup_sim_threshold
		{
			tracing::info!(article_id = %nearest.article_id, "Reusing near-duplicate article.");

			return Ok(GenerateArticleResponse {
				article_id: nearest.article_id,
				title: nearest.title,
				created: false,
			});
		}

		let stored = KbArticle {
			article_id: Uuid::new_v4(),
			title: title.clone(),
			body,
			tags: article.tags,
			source_ticket_id: Some(ticket.ticket_id),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		queries::insert_kb_article(&mut *tx, &stored).await?;
		queries::upsert_article_embedding(
			&mut *tx,
			stored.article_id,
			&self.cfg.providers.embedding.model,
			&vector,
			now,
		)
		.await?;

		tx.commit().await?;

		tracing::info!(article_id = %stored.article_id, "Knowledge-base article created.");

		Ok(GenerateArticleResponse { article_id: stored.article_id, title, created: true })
	}
}

fn article_prompt(subject: &str, transcript: &str) -> Vec<Value> {
	vec![
		serde_json::json!({
			"role": "system",
			"content": "You write concise knowledge-base articles from support conversations. \
				Respond with a JSON object: {\"title\": string, \"body\": string, \"tags\": [string]}.",
		}),
		serde_json::json!({
			"role": "user",
			"content": format!("Ticket subject: {subject}\n\nConversation:\n{transcript}"),
		}),
	]
}
