use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use porter_domain::{
	category,
	status::{TicketPriority, TicketStatus},
};
use porter_storage::{
	models::{Ticket, TicketMessage},
	queries,
};

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTicketRequest {
	pub customer_email: String,
	pub customer_name: Option<String>,
	pub subject: String,
	pub description: String,
	pub priority: Option<String>,
	pub category: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTicketResponse {
	pub ticket_id: Uuid,
	pub status: TicketStatus,
	pub priority: TicketPriority,
	pub category: Option<String>,
	pub category_reassigned: bool,
}

impl PorterService {
	pub async fn create_ticket(&self, req: CreateTicketRequest) -> Result<CreateTicketResponse> {
		let now = OffsetDateTime::now_utc();
		let email = req.customer_email.trim();
		let subject = req.subject.trim();
		let description = req.description.trim();

		if subject.is_empty() || description.is_empty() {
			return Err(Error::InvalidRequest {
				message: "subject and description are required.".to_string(),
			});
		}
		if !is_plausible_email(email) {
			return Err(Error::InvalidRequest {
				message: "customer_email is not a valid address.".to_string(),
			});
		}

		let priority = match req.priority.as_deref() {
			Some(raw) => TicketPriority::parse(raw).ok_or_else(|| Error::InvalidRequest {
				message: format!("Unknown priority {raw}."),
			})?,
			None => TicketPriority::parse(&self.cfg.tickets.default_priority)
				.unwrap_or(TicketPriority::Normal),
		};
		let requested_category = req
			.category
			.as_deref()
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(str::to_string);

		// A transient embedding failure should not lose a support ticket;
		// the ticket is created untriaged instead.
		let embedding = match self.embed_one(&format!("{subject}\n\n{description}")).await {
			Ok(vector) => Some(vector),
			Err(err) => {
				tracing::warn!(error = %err, "Embedding failed; creating the ticket untriaged.");

				None
			},
		};
		let mut final_category = requested_category.clone();

		if self.cfg.tickets.triage.enabled
			&& let Some(vector) = embedding.as_ref()
		{
			let triage = &self.cfg.tickets.triage;
			let hits = queries::similar_resolved_tickets(
				&self.db.pool,
				vector,
				triage.candidate_limit as i64,
			)
			.await?;
			let scored: Vec<(String, f32)> = hits
				.into_iter()
				.filter_map(|hit| hit.category.map(|category| (category, hit.score as f32)))
				.collect();
			let weights = category::weigh_categories(&scored, triage.min_score);

			if let Some(chosen) = category::choose_category(
				requested_category.as_deref(),
				&weights,
				triage.reassign_margin,
			) {
				final_category = Some(chosen);
			}
		}

		let category_reassigned = final_category != requested_category;
		let customer = queries::find_or_create_customer(
			&self.db.pool,
			email,
			req.customer_name.as_deref().unwrap_or_else(|| local_part(email)),
			now,
		)
		.await?;
		let ticket = Ticket {
			ticket_id: Uuid::new_v4(),
			customer_id: customer.customer_id,
			subject: subject.to_string(),
			description: description.to_string(),
			status: TicketStatus::Open.as_str().to_string(),
			priority: priority.as_str().to_string(),
			category: final_category.clone(),
			assignee_id: None,
			team_id: None,
			satisfaction_rating: None,
			created_at: now,
			updated_at: now,
			resolved_at: None,
			closed_at: None,
		};
		let mut tx = self.db.pool.begin().await?;

		queries::insert_ticket(&mut *tx, &ticket).await?;
		queries::insert_ticket_message(
			&mut *tx,
			&TicketMessage {
				message_id: Uuid::new_v4(),
				ticket_id: ticket.ticket_id,
				sender_kind: "customer".to_string(),
				sender_id: Some(customer.customer_id),
				body: description.to_string(),
				created_at: now,
			},
		)
		.await?;

		if let Some(vector) = embedding.as_ref() {
			queries::upsert_ticket_embedding(
				&mut *tx,
				ticket.ticket_id,
				&self.cfg.providers.embedding.model,
				vector,
				now,
			)
			.await?;
		}

		tx.commit().await?;

		tracing::info!(
			ticket_id = %ticket.ticket_id,
			category_reassigned,
			"Ticket created."
		);

		Ok(CreateTicketResponse {
			ticket_id: ticket.ticket_id,
			status: TicketStatus::Open,
			priority,
			category: final_category,
			category_reassigned,
		})
	}
}

fn is_plausible_email(email: &str) -> bool {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map(|re| re.is_match(email)).unwrap_or(false)
}

fn local_part(email: &str) -> &str {
	email.split('@').next().unwrap_or(email)
}
