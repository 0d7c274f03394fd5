use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ChatResponse {
	choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
	message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
	content: String,
}

/// Runs a chat completion and parses the returned content as JSON,
/// retrying a couple of times when the model answers with something that
/// does not parse.
pub async fn complete_json(
	cfg: &porter_config::GenerationProviderConfig,
	messages: &[Value],
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": messages,
		});
		let res = client
			.post(&url)
			.headers(crate::request_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let parsed: ChatResponse = res.error_for_status()?.json().await?;
		let Some(choice) = parsed.choices.into_iter().next() else {
			return Err(eyre::eyre!("Generation response has no choices."));
		};

		if let Ok(value) = parse_json_content(&choice.message.content) {
			return Ok(value);
		}
	}

	Err(eyre::eyre!("Generation response is not valid JSON."))
}

/// Models routinely wrap JSON answers in Markdown code fences; strip them
/// before parsing.
fn parse_json_content(content: &str) -> Result<Value> {
	let mut trimmed = content.trim();

	if let Some(rest) = trimmed.strip_prefix("```json").or_else(|| trimmed.strip_prefix("```")) {
		trimmed = rest.strip_suffix("```").unwrap_or(rest).trim();
	}

	Ok(serde_json::from_str(trimmed)?)
}
