use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use porter_domain::status::{TicketPriority, TicketStatus};

use crate::{Error, PorterService, Result, TicketOp};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
	pub ticket_id: Uuid,
	pub status: Option<String>,
	pub priority: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateTicketResponse {
	pub ticket_id: Uuid,
	pub status: TicketStatus,
	pub priority: TicketPriority,
	pub op: TicketOp,
}

impl PorterService {
	pub async fn update_ticket(&self, req: UpdateTicketRequest) -> Result<UpdateTicketResponse> {
		let now = OffsetDateTime::now_utc();

		if req.status.is_none() && req.priority.is_none() {
			return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
		}

		let next_status = req
			.status
			.as_deref()
			.map(|raw| {
				TicketStatus::parse(raw).ok_or_else(|| Error::InvalidRequest {
					message: format!("Unknown status {raw}."),
				})
			})
			.transpose()?;
		let next_priority = req
			.priority
			.as_deref()
			.map(|raw| {
				TicketPriority::parse(raw).ok_or_else(|| Error::InvalidRequest {
					message: format!("Unknown priority {raw}."),
				})
			})
			.transpose()?;
		let mut tx = self.db.pool.begin().await?;
		let mut ticket = crate::load_ticket_for_update(&mut tx, req.ticket_id).await?;
		let current_status = crate::stored_status(&ticket)?;
		let current_priority =
			TicketPriority::parse(&ticket.priority).ok_or_else(|| Error::Storage {
				message: format!(
					"Ticket {} has unrecognized priority {}.",
					ticket.ticket_id, ticket.priority
				),
			})?;
		let target_status = next_status.unwrap_or(current_status);
		let target_priority = next_priority.unwrap_or(current_priority);
		let changed = target_status != current_status || target_priority != current_priority;

		if !changed {
			tx.commit().await?;

			return Ok(UpdateTicketResponse {
				ticket_id: ticket.ticket_id,
				status: current_status,
				priority: current_priority,
				op: TicketOp::None,
			});
		}
		if !current_status.can_transition(target_status) {
			return Err(Error::Conflict {
				message: "A closed ticket can only be reopened.".to_string(),
			});
		}

		match target_status {
			TicketStatus::Resolved =>
				if ticket.resolved_at.is_none() {
					ticket.resolved_at = Some(now);
				},
			TicketStatus::Closed =>
				if ticket.closed_at.is_none() {
					ticket.closed_at = Some(now);
				},
			_ => {
				ticket.resolved_at = None;
				ticket.closed_at = None;
			},
		}

		ticket.status = target_status.as_str().to_string();
		ticket.priority = target_priority.as_str().to_string();
		ticket.updated_at = now;

		sqlx::query(
			"\
UPDATE tickets
SET status = $1, priority = $2, updated_at = $3, resolved_at = $4, closed_at = $5
WHERE ticket_id = $6",
		)
		.bind(ticket.status.as_str())
		.bind(ticket.priority.as_str())
		.bind(ticket.updated_at)
		.bind(ticket.resolved_at)
		.bind(ticket.closed_at)
		.bind(ticket.ticket_id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::info!(
			ticket_id = %ticket.ticket_id,
			status = target_status.as_str(),
			priority = target_priority.as_str(),
			"Ticket updated."
		);

		Ok(UpdateTicketResponse {
			ticket_id: ticket.ticket_id,
			status: target_status,
			priority: target_priority,
			op: TicketOp::Update,
		})
	}
}
