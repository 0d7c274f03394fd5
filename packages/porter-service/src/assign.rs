use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use porter_domain::status::TicketStatus;
use porter_storage::queries;

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignTicketRequest {
	pub ticket_id: Uuid,
	pub employee_id: Option<Uuid>,
	pub team_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignTicketResponse {
	pub ticket_id: Uuid,
	pub assignee_id: Option<Uuid>,
	pub team_id: Option<Uuid>,
}

impl PorterService {
	/// Assigns a ticket to an agent, a team, or both. A team-only
	/// assignment sends the ticket back to the team queue and clears any
	/// previous assignee.
	pub async fn assign_ticket(&self, req: AssignTicketRequest) -> Result<AssignTicketResponse> {
		let now = OffsetDateTime::now_utc();

		if req.employee_id.is_none() && req.team_id.is_none() {
			return Err(Error::InvalidRequest {
				message: "employee_id or team_id is required.".to_string(),
			});
		}

		let mut tx = self.db.pool.begin().await?;
		let ticket = crate::load_ticket_for_update(&mut tx, req.ticket_id).await?;

		if crate::stored_status(&ticket)? == TicketStatus::Closed {
			return Err(Error::Conflict { message: "Ticket is closed.".to_string() });
		}

		let (assignee_id, team_id) = match req.employee_id {
			Some(employee_id) => {
				let employee = queries::fetch_employee(&mut *tx, employee_id)
					.await?
					.ok_or_else(|| Error::NotFound {
						message: "Employee not found.".to_string(),
					})?;

				if let Some(team_id) = req.team_id
					&& let Some(employee_team) = employee.team_id
					&& employee_team != team_id
				{
					return Err(Error::InvalidRequest {
						message: "Employee does not belong to that team.".to_string(),
					});
				}

				(Some(employee_id), req.team_id.or(employee.team_id))
			},
			None => {
				let Some(team_id) = req.team_id else {
					return Err(Error::InvalidRequest {
						message: "employee_id or team_id is required.".to_string(),
					});
				};

				if queries::fetch_team(&mut *tx, team_id).await?.is_none() {
					return Err(Error::NotFound { message: "Team not found.".to_string() });
				}

				(None, Some(team_id))
			},
		};

		sqlx::query(
			"UPDATE tickets SET assignee_id = $1, team_id = $2, updated_at = $3 WHERE ticket_id = $4",
		)
		.bind(assignee_id)
		.bind(team_id)
		.bind(now)
		.bind(ticket.ticket_id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::info!(ticket_id = %ticket.ticket_id, "Ticket assigned.");

		Ok(AssignTicketResponse { ticket_id: ticket.ticket_id, assignee_id, team_id })
	}
}
