//! Category weighting for ticket triage.
//!
//! Candidates come from the similarity search over previously resolved
//! tickets: each match contributes its similarity score to its category's
//! accumulated weight. A category requested by the customer is only
//! overridden when the strongest candidate outweighs it by a margin.

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryWeight {
	pub category: String,
	pub weight: f32,
}

/// Accumulates per-category weights from `(category, similarity)` pairs,
/// ignoring matches below `min_score`. The result is sorted by descending
/// weight; ties break on the category name so the ordering is stable.
pub fn weigh_categories(matches: &[(String, f32)], min_score: f32) -> Vec<CategoryWeight> {
	let mut weights: Vec<CategoryWeight> = Vec::new();

	for (category, score) in matches {
		if *score < min_score || !score.is_finite() {
			continue;
		}

		match weights.iter_mut().find(|entry| &entry.category == category) {
			Some(entry) => entry.weight += score,
			None =>
				weights.push(CategoryWeight { category: category.clone(), weight: *score }),
		}
	}

	weights.sort_by(|a, b| {
		b.weight
			.partial_cmp(&a.weight)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.category.cmp(&b.category))
	});

	weights
}

/// Decides whether the ticket should take a different category than the one
/// requested. Returns `Some` with the winning category, or `None` to keep
/// the request as-is.
pub fn choose_category(
	requested: Option<&str>,
	weights: &[CategoryWeight],
	reassign_margin: f32,
) -> Option<String> {
	let top = weights.first()?;

	let Some(requested) = requested else {
		return Some(top.category.clone());
	};

	if top.category == requested {
		return None;
	}

	let requested_weight = weights
		.iter()
		.find(|entry| entry.category == requested)
		.map(|entry| entry.weight)
		.unwrap_or(0.0);

	if top.weight > requested_weight + reassign_margin {
		return Some(top.category.clone());
	}

	None
}
