use pgvector::Vector;
use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{
		Customer, Employee, Feedback, IntentHit, KbArticle, SimilarArticle, SimilarTicket, Team,
		TeamIntent, Ticket, TicketMessage,
	},
};

/// Returns the existing customer for `email`, creating one when none
/// exists. The no-op conflict update makes `RETURNING` yield the stored
/// row either way.
pub async fn find_or_create_customer(
	executor: impl PgExecutor<'_>,
	email: &str,
	name: &str,
	now: OffsetDateTime,
) -> Result<Customer> {
	let customer = sqlx::query_as::<_, Customer>(
		"\
INSERT INTO customers (customer_id, email, name, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
RETURNING customer_id, email, name, created_at",
	)
	.bind(Uuid::new_v4())
	.bind(email)
	.bind(name)
	.bind(now)
	.fetch_one(executor)
	.await?;

	Ok(customer)
}

pub async fn insert_team(executor: impl PgExecutor<'_>, team: &Team) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO teams (team_id, name, description, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(team.team_id)
	.bind(team.name.as_str())
	.bind(team.description.as_deref())
	.bind(team.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_team(executor: impl PgExecutor<'_>, team_id: Uuid) -> Result<Option<Team>> {
	let team = sqlx::query_as::<_, Team>(
		"SELECT team_id, name, description, created_at FROM teams WHERE team_id = $1",
	)
	.bind(team_id)
	.fetch_optional(executor)
	.await?;

	Ok(team)
}

pub async fn fetch_team_by_name(
	executor: impl PgExecutor<'_>,
	name: &str,
) -> Result<Option<Team>> {
	let team = sqlx::query_as::<_, Team>(
		"SELECT team_id, name, description, created_at FROM teams WHERE lower(name) = lower($1)",
	)
	.bind(name)
	.fetch_optional(executor)
	.await?;

	Ok(team)
}

pub async fn list_teams(executor: impl PgExecutor<'_>) -> Result<Vec<Team>> {
	let teams = sqlx::query_as::<_, Team>(
		"SELECT team_id, name, description, created_at FROM teams ORDER BY name",
	)
	.fetch_all(executor)
	.await?;

	Ok(teams)
}

pub async fn insert_employee(executor: impl PgExecutor<'_>, employee: &Employee) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO employees (employee_id, team_id, email, name, role, created_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(employee.employee_id)
	.bind(employee.team_id)
	.bind(employee.email.as_str())
	.bind(employee.name.as_str())
	.bind(employee.role.as_str())
	.bind(employee.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_employee(
	executor: impl PgExecutor<'_>,
	employee_id: Uuid,
) -> Result<Option<Employee>> {
	let employee = sqlx::query_as::<_, Employee>(
		"\
SELECT employee_id, team_id, email, name, role, created_at
FROM employees
WHERE employee_id = $1",
	)
	.bind(employee_id)
	.fetch_optional(executor)
	.await?;

	Ok(employee)
}

pub async fn insert_ticket(executor: impl PgExecutor<'_>, ticket: &Ticket) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO tickets (
	ticket_id,
	customer_id,
	subject,
	description,
	status,
	priority,
	category,
	assignee_id,
	team_id,
	satisfaction_rating,
	created_at,
	updated_at,
	resolved_at,
	closed_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(ticket.ticket_id)
	.bind(ticket.customer_id)
	.bind(ticket.subject.as_str())
	.bind(ticket.description.as_str())
	.bind(ticket.status.as_str())
	.bind(ticket.priority.as_str())
	.bind(ticket.category.as_deref())
	.bind(ticket.assignee_id)
	.bind(ticket.team_id)
	.bind(ticket.satisfaction_rating)
	.bind(ticket.created_at)
	.bind(ticket.updated_at)
	.bind(ticket.resolved_at)
	.bind(ticket.closed_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_ticket(
	executor: impl PgExecutor<'_>,
	ticket_id: Uuid,
) -> Result<Option<Ticket>> {
	let ticket =
		sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE ticket_id = $1")
			.bind(ticket_id)
			.fetch_optional(executor)
			.await?;

	Ok(ticket)
}

pub async fn insert_ticket_message(
	executor: impl PgExecutor<'_>,
	message: &TicketMessage,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ticket_messages (message_id, ticket_id, sender_kind, sender_id, body, created_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(message.message_id)
	.bind(message.ticket_id)
	.bind(message.sender_kind.as_str())
	.bind(message.sender_id)
	.bind(message.body.as_str())
	.bind(message.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_ticket_messages(
	executor: impl PgExecutor<'_>,
	ticket_id: Uuid,
) -> Result<Vec<TicketMessage>> {
	let messages = sqlx::query_as::<_, TicketMessage>(
		"\
SELECT message_id, ticket_id, sender_kind, sender_id, body, created_at
FROM ticket_messages
WHERE ticket_id = $1
ORDER BY created_at",
	)
	.bind(ticket_id)
	.fetch_all(executor)
	.await?;

	Ok(messages)
}

pub async fn upsert_ticket_embedding(
	executor: impl PgExecutor<'_>,
	ticket_id: Uuid,
	model: &str,
	embedding: &[f32],
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ticket_embeddings (ticket_id, model, embedding, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (ticket_id) DO UPDATE SET model = EXCLUDED.model, embedding = EXCLUDED.embedding, created_at = EXCLUDED.created_at",
	)
	.bind(ticket_id)
	.bind(model)
	.bind(Vector::from(embedding.to_vec()))
	.bind(now)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn similar_resolved_tickets(
	executor: impl PgExecutor<'_>,
	embedding: &[f32],
	limit: i64,
) -> Result<Vec<SimilarTicket>> {
	let hits = sqlx::query_as::<_, SimilarTicket>(
		"\
SELECT t.ticket_id, t.category, 1 - (e.embedding <=> $1) AS score
FROM ticket_embeddings e
JOIN tickets t ON t.ticket_id = e.ticket_id
WHERE t.status IN ('resolved', 'closed') AND t.category IS NOT NULL
ORDER BY e.embedding <=> $1
LIMIT $2",
	)
	.bind(Vector::from(embedding.to_vec()))
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(hits)
}

pub async fn insert_feedback(executor: impl PgExecutor<'_>, feedback: &Feedback) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO feedback (
	feedback_id,
	ticket_id,
	token,
	rating,
	comment,
	requested_at,
	submitted_at,
	expires_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(feedback.feedback_id)
	.bind(feedback.ticket_id)
	.bind(feedback.token)
	.bind(feedback.rating)
	.bind(feedback.comment.as_deref())
	.bind(feedback.requested_at)
	.bind(feedback.submitted_at)
	.bind(feedback.expires_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// The still-open feedback request for a ticket, if any: not yet submitted
/// and not yet expired.
pub async fn fetch_open_feedback(
	executor: impl PgExecutor<'_>,
	ticket_id: Uuid,
	now: OffsetDateTime,
) -> Result<Option<Feedback>> {
	let feedback = sqlx::query_as::<_, Feedback>(
		"\
SELECT *
FROM feedback
WHERE ticket_id = $1 AND submitted_at IS NULL AND expires_at > $2
ORDER BY requested_at DESC
LIMIT 1",
	)
	.bind(ticket_id)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(feedback)
}

pub async fn insert_kb_article(executor: impl PgExecutor<'_>, article: &KbArticle) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO kb_articles (article_id, title, body, tags, source_ticket_id, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(article.article_id)
	.bind(article.title.as_str())
	.bind(article.body.as_str())
	.bind(&article.tags)
	.bind(article.source_ticket_id)
	.bind(article.created_at)
	.bind(article.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_kb_article(
	executor: impl PgExecutor<'_>,
	article_id: Uuid,
) -> Result<Option<KbArticle>> {
	let article =
		sqlx::query_as::<_, KbArticle>("SELECT * FROM kb_articles WHERE article_id = $1")
			.bind(article_id)
			.fetch_optional(executor)
			.await?;

	Ok(article)
}

pub async fn upsert_article_embedding(
	executor: impl PgExecutor<'_>,
	article_id: Uuid,
	model: &str,
	embedding: &[f32],
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO article_embeddings (article_id, model, embedding, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (article_id) DO UPDATE SET model = EXCLUDED.model, embedding = EXCLUDED.embedding, created_at = EXCLUDED.created_at",
	)
	.bind(article_id)
	.bind(model)
	.bind(Vector::from(embedding.to_vec()))
	.bind(now)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn similar_articles(
	executor: impl PgExecutor<'_>,
	embedding: &[f32],
	limit: i64,
) -> Result<Vec<SimilarArticle>> {
	let hits = sqlx::query_as::<_, SimilarArticle>(
		"\
SELECT a.article_id, a.title, 1 - (e.embedding <=> $1) AS score
FROM article_embeddings e
JOIN kb_articles a ON a.article_id = e.article_id
ORDER BY e.embedding <=> $1
LIMIT $2",
	)
	.bind(Vector::from(embedding.to_vec()))
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(hits)
}

pub async fn insert_team_intent(
	executor: impl PgExecutor<'_>,
	intent: &TeamIntent,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO team_intents (intent_id, team_id, phrase, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(intent.intent_id)
	.bind(intent.team_id)
	.bind(intent.phrase.as_str())
	.bind(intent.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_team_intent(
	executor: impl PgExecutor<'_>,
	intent_id: Uuid,
) -> Result<Option<TeamIntent>> {
	let intent = sqlx::query_as::<_, TeamIntent>(
		"SELECT intent_id, team_id, phrase, created_at FROM team_intents WHERE intent_id = $1",
	)
	.bind(intent_id)
	.fetch_optional(executor)
	.await?;

	Ok(intent)
}

pub async fn set_intent_embedding(
	executor: impl PgExecutor<'_>,
	intent_id: Uuid,
	embedding: &[f32],
) -> Result<()> {
	sqlx::query("UPDATE team_intents SET embedding = $1 WHERE intent_id = $2")
		.bind(Vector::from(embedding.to_vec()))
		.bind(intent_id)
		.execute(executor)
		.await?;

	Ok(())
}

/// Intent phrases nearest to the query vector, joined with their team.
/// Intents that have no embedding yet never match.
pub async fn nearest_intents(
	executor: impl PgExecutor<'_>,
	embedding: &[f32],
	limit: i64,
) -> Result<Vec<IntentHit>> {
	let hits = sqlx::query_as::<_, IntentHit>(
		"\
SELECT i.team_id, te.name AS team_name, i.phrase, 1 - (i.embedding <=> $1) AS score
FROM team_intents i
JOIN teams te ON te.team_id = i.team_id
WHERE i.embedding IS NOT NULL
ORDER BY i.embedding <=> $1
LIMIT $2",
	)
	.bind(Vector::from(embedding.to_vec()))
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(hits)
}
