use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use porter_storage::queries;

use crate::{Error, PorterService, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingSource {
	Ticket,
	Article,
	Intent,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateEmbeddingRequest {
	pub source_type: EmbeddingSource,
	pub source_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateEmbeddingResponse {
	pub source_type: EmbeddingSource,
	pub source_id: Uuid,
	pub model: String,
	pub dimensions: u32,
}

impl PorterService {
	/// Recomputes and stores the vector for a stored row. This is the
	/// backfill path for rows whose embeddings are missing (for example
	/// freshly seeded intent phrases) or stale after a model change.
	pub async fn generate_embedding(
		&self,
		req: GenerateEmbeddingRequest,
	) -> Result<GenerateEmbeddingResponse> {
		let now = OffsetDateTime::now_utc();
		let text = match req.source_type {
			EmbeddingSource::Ticket => {
				let ticket = queries::fetch_ticket(&self.db.pool, req.source_id)
					.await?
					.ok_or_else(|| Error::NotFound {
						message: "Ticket not found.".to_string(),
					})?;

				format!("{}\n\n{}", ticket.subject, ticket.description)
			},
			EmbeddingSource::Article => {
				let article = queries::fetch_kb_article(&self.db.pool, req.source_id)
					.await?
					.ok_or_else(|| Error::NotFound {
						message: "Article not found.".to_string(),
					})?;

				format!("{}\n\n{}", article.title, article.body)
			},
			EmbeddingSource::Intent => {
				let intent = queries::fetch_team_intent(&self.db.pool, req.source_id)
					.await?
					.ok_or_else(|| Error::NotFound {
						message: "Intent not found.".to_string(),
					})?;

				intent.phrase
			},
		};
		let vector = self.embed_one(&text).await?;
		let model = self.cfg.providers.embedding.model.clone();

		match req.source_type {
			EmbeddingSource::Ticket =>
				queries::upsert_ticket_embedding(&self.db.pool, req.source_id, &model, &vector, now)
					.await?,
			EmbeddingSource::Article =>
				queries::upsert_article_embedding(
					&self.db.pool,
					req.source_id,
					&model,
					&vector,
					now,
				)
				.await?,
			EmbeddingSource::Intent =>
				queries::set_intent_embedding(&self.db.pool, req.source_id, &vector).await?,
		}

		Ok(GenerateEmbeddingResponse {
			source_type: req.source_type,
			source_id: req.source_id,
			model,
			dimensions: self.cfg.providers.embedding.dimensions,
		})
	}
}
