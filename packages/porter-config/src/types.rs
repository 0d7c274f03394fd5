use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub tickets: Tickets,
	pub kb: Kb,
	pub suggestions: Suggestions,
	pub routing: Routing,
	pub feedback: Feedback,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub vector_dim: u32,
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generation: GenerationProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerationProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tickets {
	pub default_priority: String,
	pub triage: Triage,
}

/// Knobs for the category-reassignment pass at ticket creation. Candidates
/// below `min_score` are ignored; a requested category is only overridden
/// when the winner outweighs it by more than `reassign_margin`.
#[derive(Clone, Debug, Deserialize)]
pub struct Triage {
	pub enabled: bool,
	pub candidate_limit: u32,
	pub min_score: f32,
	pub reassign_margin: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Kb {
	pub dup_sim_threshold: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Suggestions {
	pub cache_ttl_seconds: i64,
	pub sweep_interval_seconds: u64,
	pub max_actions: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Routing {
	pub candidate_limit: u32,
	pub min_score: f32,
	pub fallback_team: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Feedback {
	pub token_ttl_days: i64,
}
