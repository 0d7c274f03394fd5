//! Per-team aggregation of intent-phrase similarity for conversational
//! routing.

use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct IntentMatch {
	pub team_id: Uuid,
	pub team_name: String,
	pub phrase: String,
	pub score: f32,
}

#[derive(Clone, Debug)]
pub struct TeamScore {
	pub team_id: Uuid,
	pub team_name: String,
	pub weight: f32,
	pub best_phrase: String,
	pub best_score: f32,
}

/// Sums similarity per team and tracks each team's strongest phrase.
/// Sorted by descending weight; ties break on the team name.
pub fn aggregate_teams(matches: &[IntentMatch]) -> Vec<TeamScore> {
	let mut scores: Vec<TeamScore> = Vec::new();

	for m in matches {
		if !m.score.is_finite() {
			continue;
		}

		match scores.iter_mut().find(|entry| entry.team_id == m.team_id) {
			Some(entry) => {
				entry.weight += m.score;

				if m.score > entry.best_score {
					entry.best_score = m.score;
					entry.best_phrase = m.phrase.clone();
				}
			},
			None => scores.push(TeamScore {
				team_id: m.team_id,
				team_name: m.team_name.clone(),
				weight: m.score,
				best_phrase: m.phrase.clone(),
				best_score: m.score,
			}),
		}
	}

	scores.sort_by(|a, b| {
		b.weight
			.partial_cmp(&a.weight)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.team_name.cmp(&b.team_name))
	});

	scores
}

/// The top-weighted team wins the route, but only when its strongest
/// phrase clears `min_score`; otherwise the caller falls back.
pub fn choose_team(scores: &[TeamScore], min_score: f32) -> Option<&TeamScore> {
	let top = scores.first()?;

	if top.best_score >= min_score { Some(top) } else { None }
}
