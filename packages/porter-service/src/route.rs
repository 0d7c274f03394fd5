use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use porter_domain::routing::{self, IntentMatch};
use porter_storage::{models::Team, queries};

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteRequest {
	pub message: String,
	pub customer_id: Option<Uuid>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
	Intent,
	Llm,
	Fallback,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteResponse {
	pub team_id: Uuid,
	pub team_name: String,
	pub confidence: Option<f32>,
	pub matched_phrase: Option<String>,
	pub decided_by: RouteDecision,
}

impl PorterService {
	/// Routes a conversation to a team: intent-phrase similarity first,
	/// then a generation-provider pick over the team roster, then the
	/// configured fallback team.
	pub async fn route_conversation(&self, req: RouteRequest) -> Result<RouteResponse> {
		let message = req.message.trim();

		if message.is_empty() {
			return Err(Error::InvalidRequest { message: "message is required.".to_string() });
		}

		let vector = self.embed_one(message).await?;
		let hits = queries::nearest_intents(
			&self.db.pool,
			&vector,
			self.cfg.routing.candidate_limit as i64,
		)
		.await?;
		let matches: Vec<IntentMatch> = hits
			.into_iter()
			.map(|hit| IntentMatch {
				team_id: hit.team_id,
				team_name: hit.team_name,
				phrase: hit.phrase,
				score: hit.score as f32,
			})
			.collect();
		let scores = routing::aggregate_teams(&matches);

		if let Some(top) = routing::choose_team(&scores, self.cfg.routing.min_score) {
			return Ok(RouteResponse {
				team_id: top.team_id,
				team_name: top.team_name.clone(),
				confidence: Some(top.best_score),
				matched_phrase: Some(top.best_phrase.clone()),
				decided_by: RouteDecision::Intent,
			});
		}

		let teams = queries::list_teams(&self.db.pool).await?;

		if !teams.is_empty()
			&& let Some(team) = self.pick_team_via_generation(message, &teams).await
		{
			return Ok(RouteResponse {
				team_id: team.team_id,
				team_name: team.name,
				confidence: None,
				matched_phrase: None,
				decided_by: RouteDecision::Llm,
			});
		}

		if let Some(fallback) = self.cfg.routing.fallback_team.as_deref()
			&& let Some(team) = queries::fetch_team_by_name(&self.db.pool, fallback).await?
		{
			return Ok(RouteResponse {
				team_id: team.team_id,
				team_name: team.name,
				confidence: None,
				matched_phrase: None,
				decided_by: RouteDecision::Fallback,
			});
		}

		Err(Error::NotFound { message: "No route matched.".to_string() })
	}

	async fn pick_team_via_generation(&self, message: &str, teams: &[Team]) -> Option<Team> {
		let prompt = routing_prompt(message, teams);
		let value = match self
			.providers
			.generation
			.complete_json(&self.cfg.providers.generation, &prompt)
			.await
		{
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(error = %err, "Routing fallback generation failed.");

				return None;
			},
		};
		let name = value.get("team").and_then(|team| team.as_str())?.trim();

		teams.iter().find(|team| team.name.eq_ignore_ascii_case(name)).cloned()
	}
}

fn routing_prompt(message: &str, teams: &[Team]) -> Vec<Value> {
	let roster = teams
		.iter()
		.map(|team| match team.description.as_deref() {
			Some(description) => format!("- {}: {description}", team.name),
			None => format!("- {}", team.name),
		})
		.collect::<Vec<_>>()
		.join("\n");

	vec![
		serde_json::json!({
			"role": "system",
			"content": "You route customer messages to support teams. Respond with a JSON \
				object: {\"team\": string}, naming one of the listed teams.",
		}),
		serde_json::json!({
			"role": "user",
			"content": format!("Teams:\n{roster}\n\nCustomer message: {message}"),
		}),
	]
}
