use serde::{Deserialize, Serialize};
use uuid::Uuid;

use porter_domain::status::{TicketPriority, TicketStatus};
use porter_storage::models::Ticket;

use crate::{Error, PorterService, Result};

const MAX_LISTED_TICKETS: i64 = 200;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListTicketsRequest {
	pub status: Option<String>,
	pub priority: Option<String>,
	pub category: Option<String>,
	pub customer_id: Option<Uuid>,
	pub assignee_id: Option<Uuid>,
	pub team_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketListItem {
	pub ticket_id: Uuid,
	pub subject: String,
	pub status: String,
	pub priority: String,
	pub category: Option<String>,
	pub customer_id: Uuid,
	pub assignee_id: Option<Uuid>,
	pub team_id: Option<Uuid>,
	pub satisfaction_rating: Option<i32>,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: time::OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListTicketsResponse {
	pub items: Vec<TicketListItem>,
}

impl PorterService {
	pub async fn list_tickets(&self, req: ListTicketsRequest) -> Result<ListTicketsResponse> {
		if let Some(status) = req.status.as_deref()
			&& TicketStatus::parse(status).is_none()
		{
			return Err(Error::InvalidRequest { message: format!("Unknown status {status}.") });
		}
		if let Some(priority) = req.priority.as_deref()
			&& TicketPriority::parse(priority).is_none()
		{
			return Err(Error::InvalidRequest {
				message: format!("Unknown priority {priority}."),
			});
		}

		let mut builder = sqlx::QueryBuilder::new(
			"SELECT ticket_id, customer_id, subject, description, status, priority, category, \
			 assignee_id, team_id, satisfaction_rating, created_at, updated_at, resolved_at, \
			 closed_at FROM tickets WHERE TRUE",
		);

		if let Some(status) = &req.status {
			builder.push(" AND status = ");
			builder.push_bind(status);
		}
		if let Some(priority) = &req.priority {
			builder.push(" AND priority = ");
			builder.push_bind(priority);
		}
		if let Some(category) = &req.category {
			builder.push(" AND category = ");
			builder.push_bind(category);
		}
		if let Some(customer_id) = req.customer_id {
			builder.push(" AND customer_id = ");
			builder.push_bind(customer_id);
		}
		if let Some(assignee_id) = req.assignee_id {
			builder.push(" AND assignee_id = ");
			builder.push_bind(assignee_id);
		}
		if let Some(team_id) = req.team_id {
			builder.push(" AND team_id = ");
			builder.push_bind(team_id);
		}

		builder.push(" ORDER BY created_at DESC LIMIT ");
		builder.push_bind(MAX_LISTED_TICKETS);

		let tickets: Vec<Ticket> = builder.build_query_as().fetch_all(&self.db.pool).await?;
		let items = tickets
			.into_iter()
			.map(|ticket| TicketListItem {
				ticket_id: ticket.ticket_id,
				subject: ticket.subject,
				status: ticket.status,
				priority: ticket.priority,
				category: ticket.category,
				customer_id: ticket.customer_id,
				assignee_id: ticket.assignee_id,
				team_id: ticket.team_id,
				satisfaction_rating: ticket.satisfaction_rating,
				created_at: ticket.created_at,
				updated_at: ticket.updated_at,
			})
			.collect();

		Ok(ListTicketsResponse { items })
	}
}
