use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use porter_storage::{models::Feedback, queries};

use crate::{Error, PorterService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestFeedbackRequest {
	pub ticket_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestFeedbackResponse {
	pub feedback_id: Uuid,
	pub token: Uuid,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
	pub token: Uuid,
	pub rating: i32,
	pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
	pub feedback_id: Uuid,
	pub ticket_id: Uuid,
	pub rating: i32,
}

impl PorterService {
	/// Idempotent: a ticket with an open (unsubmitted, unexpired) request
	/// gets the same token back instead of a new row.
	pub async fn request_feedback(
		&self,
		req: RequestFeedbackRequest,
	) -> Result<RequestFeedbackResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let ticket = crate::load_ticket_for_update(&mut tx, req.ticket_id).await?;

		if !crate::stored_status(&ticket)?.is_settled() {
			return Err(Error::Conflict {
				message: "Feedback can only be requested for resolved or closed tickets."
					.to_string(),
			});
		}

		if let Some(existing) = queries::fetch_open_feedback(&mut *tx, ticket.ticket_id, now).await?
		{
			tx.commit().await?;

			return Ok(RequestFeedbackResponse {
				feedback_id: existing.feedback_id,
				token: existing.token,
				expires_at: existing.expires_at,
			});
		}

		let feedback = Feedback {
			feedback_id: Uuid::new_v4(),
			ticket_id: ticket.ticket_id,
			token: Uuid::new_v4(),
			rating: None,
			comment: None,
			requested_at: now,
			submitted_at: None,
			expires_at: now + Duration::days(self.cfg.feedback.token_ttl_days),
		};

		queries::insert_feedback(&mut *tx, &feedback).await?;

		tx.commit().await?;

		tracing::info!(ticket_id = %ticket.ticket_id, "Feedback requested.");

		Ok(RequestFeedbackResponse {
			feedback_id: feedback.feedback_id,
			token: feedback.token,
			expires_at: feedback.expires_at,
		})
	}

	pub async fn submit_feedback(
		&self,
		req: SubmitFeedbackRequest,
	) -> Result<SubmitFeedbackResponse> {
		let now = OffsetDateTime::now_utc();

		if !(1..=5).contains(&req.rating) {
			return Err(Error::InvalidRequest {
				message: "rating must be between 1 and 5.".to_string(),
			});
		}

		let comment = req
			.comment
			.as_deref()
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(str::to_string);
		let mut tx = self.db.pool.begin().await?;
		let feedback = load_feedback_by_token(&mut tx, req.token).await?;

		if feedback.submitted_at.is_some() {
			return Err(Error::Conflict { message: "Feedback already submitted.".to_string() });
		}
		if feedback.expires_at <= now {
			return Err(Error::Conflict { message: "Feedback request expired.".to_string() });
		}

		sqlx::query(
			"UPDATE feedback SET rating = $1, comment = $2, submitted_at = $3 WHERE feedback_id = $4",
		)
		.bind(req.rating)
		.bind(comment.as_deref())
		.bind(now)
		.bind(feedback.feedback_id)
		.execute(&mut *tx)
		.await?;
		sqlx::query(
			"UPDATE tickets SET satisfaction_rating = $1, updated_at = $2 WHERE ticket_id = $3",
		)
		.bind(req.rating)
		.bind(now)
		.bind(feedback.ticket_id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::info!(ticket_id = %feedback.ticket_id, rating = req.rating, "Feedback submitted.");

		Ok(SubmitFeedbackResponse {
			feedback_id: feedback.feedback_id,
			ticket_id: feedback.ticket_id,
			rating: req.rating,
		})
	}
}

async fn load_feedback_by_token(
	tx: &mut Transaction<'_, Postgres>,
	token: Uuid,
) -> Result<Feedback> {
	sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE token = $1 FOR UPDATE")
		.bind(token)
		.fetch_optional(&mut **tx)
		.await?
		.ok_or_else(|| Error::NotFound { message: "Feedback request not found.".to_string() })
}
