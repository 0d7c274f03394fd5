use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	#[serde(default)]
	index: Option<usize>,
	embedding: Vec<f32>,
}

pub async fn embed(
	cfg: &porter_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::request_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: EmbeddingResponse = res.error_for_status()?.json().await?;

	order_embeddings(parsed, texts.len())
}

/// Providers are allowed to return items out of order; the `index` field is
/// authoritative when present.
fn order_embeddings(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
	if response.data.len() != expected {
		return Err(eyre::eyre!(
			"Embedding response returned {} vectors for {expected} inputs.",
			response.data.len()
		));
	}

	let mut indexed: Vec<(usize, Vec<f32>)> = response
		.data
		.into_iter()
		.enumerate()
		.map(|(fallback, item)| (item.index.unwrap_or(fallback), item.embedding))
		.collect();

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
