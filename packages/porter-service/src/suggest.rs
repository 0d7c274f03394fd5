use std::{
	collections::{HashMap, HashSet},
	sync::Mutex,
};

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
	pub selector: String,
	pub kind: Option<String>,
	pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
	pub selector: String,
	pub action: String,
	pub value: Option<String>,
	pub reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestRequest {
	pub session_id: String,
	pub page_url: String,
	pub elements: Vec<PageElement>,
	pub goal: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
	pub actions: Vec<SuggestedAction>,
	pub cached: bool,
}

/// Fixed-TTL cache for generated suggestions, keyed by a digest of the
/// request. Entries past their TTL are treated as absent on read and
/// evicted by the periodic sweep.
pub(crate) struct SuggestionCache {
	ttl: Duration,
	entries: Mutex<HashMap<[u8; 32], CacheEntry, RandomState>>,
}

struct CacheEntry {
	actions: Vec<SuggestedAction>,
	inserted_at: OffsetDateTime,
}

impl SuggestionCache {
	pub(crate) fn new(ttl: Duration) -> Self {
		Self { ttl, entries: Mutex::new(HashMap::default()) }
	}

	fn get(&self, key: &[u8; 32], now: OffsetDateTime) -> Option<Vec<SuggestedAction>> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let entry = entries.get(key)?;

		if now - entry.inserted_at >= self.ttl {
			return None;
		}

		Some(entry.actions.clone())
	}

	fn insert(&self, key: [u8; 32], actions: Vec<SuggestedAction>, now: OffsetDateTime) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(key, CacheEntry { actions, inserted_at: now });
	}

	pub(crate) fn sweep(&self, now: OffsetDateTime) -> usize {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let before = entries.len();

		entries.retain(|_, entry| now - entry.inserted_at < self.ttl);

		before - entries.len()
	}
}

impl PorterService {
	pub async fn suggest_actions(&self, req: SuggestRequest) -> Result<SuggestResponse> {
		let now = OffsetDateTime::now_utc();
		let session_id = req.session_id.trim();
		let page_url = req.page_url.trim();

		if session_id.is_empty() || page_url.is_empty() {
			return Err(Error::InvalidRequest {
				message: "session_id and page_url are required.".to_string(),
			});
		}
		if req.elements.is_empty() {
			return Err(Error::InvalidRequest {
				message: "elements must be non-empty.".to_string(),
			});
		}

		let key = cache_key(session_id, page_url, &req.elements, req.goal.as_deref());

		if let Some(actions) = self.suggestions.get(&key, now) {
			return Ok(SuggestResponse { actions, cached: true });
		}

		let prompt = suggestion_prompt(page_url, &req.elements, req.goal.as_deref());
		let value = self
			.providers
			.generation
			.complete_json(&self.cfg.providers.generation, &prompt)
			.await?;
		let actions =
			parse_actions(value, &req.elements, self.cfg.suggestions.max_actions as usize)?;

		self.suggestions.insert(key, actions.clone(), now);

		Ok(SuggestResponse { actions, cached: false })
	}
}

fn cache_key(
	session_id: &str,
	page_url: &str,
	elements: &[PageElement],
	goal: Option<&str>,
) -> [u8; 32] {
	let mut hasher = blake3::Hasher::new();

	hasher.update(session_id.as_bytes());
	hasher.update(b"\0");
	hasher.update(page_url.as_bytes());

	for element in elements {
		hasher.update(b"\0");
		hasher.update(element.selector.as_bytes());

		if let Some(kind) = &element.kind {
			hasher.update(b"\x01");
			hasher.update(kind.as_bytes());
		}
		if let Some(label) = &element.label {
			hasher.update(b"\x02");
			hasher.update(label.as_bytes());
		}
	}

	if let Some(goal) = goal {
		hasher.update(b"\0");
		hasher.update(goal.as_bytes());
	}

	*hasher.finalize().as_bytes()
}

fn suggestion_prompt(page_url: &str, elements: &[PageElement], goal: Option<&str>) -> Vec<Value> {
	let element_lines = elements
		.iter()
		.map(|element| {
			let kind = element.kind.as_deref().unwrap_or("element");
			let label = element.label.as_deref().unwrap_or("");

			format!("- {} ({kind}) {label}", element.selector)
		})
		.collect::<Vec<_>>()
		.join("\n");
	let goal_line = goal.map(|goal| format!("\nAgent goal: {goal}")).unwrap_or_default();

	vec![
		serde_json::json!({
			"role": "system",
			"content": "You suggest the next UI actions for a support agent. Respond with a \
				JSON array of {\"selector\": string, \"action\": string, \"value\": string?, \
				\"reason\": string?}. Only reference the listed selectors.",
		}),
		serde_json::json!({
			"role": "user",
			"content": format!("Page: {page_url}\nElements:\n{element_lines}{goal_line}"),
		}),
	]
}

/// Accepts either a bare array or `{"actions": [...]}`, drops actions that
/// point at selectors outside the request, and truncates to `max_actions`.
fn parse_actions(
	value: Value,
	elements: &[PageElement],
	max_actions: usize,
) -> Result<Vec<SuggestedAction>> {
	let raw = if value.is_array() {
		value
	} else if let Some(actions) = value.get("actions") {
		actions.clone()
	} else {
		return Err(Error::Provider {
			message: "Generation returned an unexpected suggestion shape.".to_string(),
		});
	};
	let actions: Vec<SuggestedAction> =
		serde_json::from_value(raw).map_err(|err| Error::Provider {
			message: format!("Generation returned an unexpected suggestion shape: {err}."),
		})?;
	let known: HashSet<&str> = elements.iter().map(|element| element.selector.as_str()).collect();

	Ok(actions
		.into_iter()
		.filter(|action| known.contains(action.selector.as_str()))
		.take(max_actions)
		.collect())
}
