pub mod assign;
pub mod create_ticket;
pub mod embeddings;
pub mod feedback;
pub mod kb;
pub mod list;
pub mod route;
pub mod suggest;
pub mod time_serde;
pub mod update_ticket;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use color_eyre::eyre;
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use porter_config::{Config, EmbeddingProviderConfig, GenerationProviderConfig};
use porter_domain::status::TicketStatus;
use porter_providers::{embedding, generation};
use porter_storage::{db::Db, models::Ticket};

pub use assign::{AssignTicketRequest, AssignTicketResponse};
pub use create_ticket::{CreateTicketRequest, CreateTicketResponse};
pub use embeddings::{EmbeddingSource, GenerateEmbeddingRequest, GenerateEmbeddingResponse};
pub use feedback::{
	RequestFeedbackRequest, RequestFeedbackResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
};
pub use kb::{GenerateArticleRequest, GenerateArticleResponse};
pub use list::{ListTicketsRequest, ListTicketsResponse, TicketListItem};
pub use route::{RouteDecision, RouteRequest, RouteResponse};
pub use suggest::{PageElement, SuggestRequest, SuggestResponse, SuggestedAction};
pub use update_ticket::{UpdateTicketRequest, UpdateTicketResponse};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn complete_json<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketOp {
	Update,
	None,
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, generation }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders), generation: Arc::new(DefaultProviders) }
	}
}

pub struct PorterService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	suggestions: suggest::SuggestionCache,
}
impl PorterService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let suggestions = suggest::SuggestionCache::new(time::Duration::seconds(
			cfg.suggestions.cache_ttl_seconds,
		));

		Self { cfg, db, providers, suggestions }
	}

	/// Evicts expired suggestion-cache entries and reports how many were
	/// removed. Driven by the API server's periodic sweep task.
	pub fn sweep_suggestions(&self) -> usize {
		self.suggestions.sweep(OffsetDateTime::now_utc())
	}

	pub(crate) async fn embed_one(&self, text: &str) -> color_eyre::Result<Vec<f32>> {
		let texts = [text.to_string()];
		let vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		vectors
			.into_iter()
			.next()
			.ok_or_else(|| eyre::eyre!("Embedding provider returned no vectors."))
	}
}

pub(crate) async fn load_ticket_for_update(
	tx: &mut Transaction<'_, Postgres>,
	ticket_id: Uuid,
) -> Result<Ticket> {
	sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE ticket_id = $1 FOR UPDATE")
		.bind(ticket_id)
		.fetch_optional(&mut **tx)
		.await?
		.ok_or_else(|| Error::NotFound { message: "Ticket not found.".to_string() })
}

/// Statuses in storage are written by this crate, so anything unparseable
/// is corruption rather than bad input.
pub(crate) fn stored_status(ticket: &Ticket) -> Result<TicketStatus> {
	TicketStatus::parse(&ticket.status).ok_or_else(|| Error::Storage {
		message: format!("Ticket {} has unrecognized status {}.", ticket.ticket_id, ticket.status),
	})
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl GenerationProvider for DefaultProviders {
	fn complete_json<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(generation::complete_json(cfg, messages))
	}
}
