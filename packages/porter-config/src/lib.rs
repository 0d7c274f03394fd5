mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Feedback, GenerationProviderConfig, Kb, Postgres, Providers,
	Routing, Service, Storage, Suggestions, Tickets, Triage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.vector_dim.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if !is_known_priority(&cfg.tickets.default_priority) {
		return Err(Error::Validation {
			message: "tickets.default_priority must be one of low, normal, high, or urgent."
				.to_string(),
		});
	}
	if cfg.tickets.triage.candidate_limit == 0 {
		return Err(Error::Validation {
			message: "tickets.triage.candidate_limit must be greater than zero.".to_string(),
		});
	}
	if !cfg.tickets.triage.min_score.is_finite()
		|| !(0.0..=1.0).contains(&cfg.tickets.triage.min_score)
	{
		return Err(Error::Validation {
			message: "tickets.triage.min_score must be a finite number in the range 0.0-1.0."
				.to_string(),
		});
	}
	if !cfg.tickets.triage.reassign_margin.is_finite() || cfg.tickets.triage.reassign_margin < 0.0
	{
		return Err(Error::Validation {
			message: "tickets.triage.reassign_margin must be a finite number of zero or greater."
				.to_string(),
		});
	}
	if !cfg.kb.dup_sim_threshold.is_finite() || !(0.0..=1.0).contains(&cfg.kb.dup_sim_threshold) {
		return Err(Error::Validation {
			message: "kb.dup_sim_threshold must be a finite number in the range 0.0-1.0."
				.to_string(),
		});
	}
	if cfg.suggestions.cache_ttl_seconds <= 0 {
		return Err(Error::Validation {
			message: "suggestions.cache_ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.suggestions.sweep_interval_seconds == 0 {
		return Err(Error::Validation {
			message: "suggestions.sweep_interval_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.suggestions.max_actions == 0 {
		return Err(Error::Validation {
			message: "suggestions.max_actions must be greater than zero.".to_string(),
		});
	}
	if cfg.routing.candidate_limit == 0 {
		return Err(Error::Validation {
			message: "routing.candidate_limit must be greater than zero.".to_string(),
		});
	}
	if !cfg.routing.min_score.is_finite() || !(0.0..=1.0).contains(&cfg.routing.min_score) {
		return Err(Error::Validation {
			message: "routing.min_score must be a finite number in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.feedback.token_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "feedback.token_ttl_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.routing
		.fallback_team
		.as_deref()
		.map(|team| team.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.routing.fallback_team = None;
	}
}

fn is_known_priority(raw: &str) -> bool {
	matches!(raw, "low" | "normal" | "high" | "urgent")
}
