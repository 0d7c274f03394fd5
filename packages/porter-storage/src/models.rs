use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Customer {
	pub customer_id: Uuid,
	pub email: String,
	pub name: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Team {
	pub team_id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Employee {
	pub employee_id: Uuid,
	pub team_id: Option<Uuid>,
	pub email: String,
	pub name: String,
	pub role: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Ticket {
	pub ticket_id: Uuid,
	pub customer_id: Uuid,
	pub subject: String,
	pub description: String,
	pub status: String,
	pub priority: String,
	pub category: Option<String>,
	pub assignee_id: Option<Uuid>,
	pub team_id: Option<Uuid>,
	pub satisfaction_rating: Option<i32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub resolved_at: Option<OffsetDateTime>,
	pub closed_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TicketMessage {
	pub message_id: Uuid,
	pub ticket_id: Uuid,
	pub sender_kind: String,
	pub sender_id: Option<Uuid>,
	pub body: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Feedback {
	pub feedback_id: Uuid,
	pub ticket_id: Uuid,
	pub token: Uuid,
	pub rating: Option<i32>,
	pub comment: Option<String>,
	pub requested_at: OffsetDateTime,
	pub submitted_at: Option<OffsetDateTime>,
	pub expires_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct KbArticle {
	pub article_id: Uuid,
	pub title: String,
	pub body: String,
	pub tags: Vec<String>,
	pub source_ticket_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TeamIntent {
	pub intent_id: Uuid,
	pub team_id: Uuid,
	pub phrase: String,
	pub created_at: OffsetDateTime,
}

/// Similarity hit against previously resolved tickets; `score` is
/// `1 - cosine_distance`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SimilarTicket {
	pub ticket_id: Uuid,
	pub category: Option<String>,
	pub score: f64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SimilarArticle {
	pub article_id: Uuid,
	pub title: String,
	pub score: f64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct IntentHit {
	pub team_id: Uuid,
	pub team_name: String,
	pub phrase: String,
	pub score: f64,
}
