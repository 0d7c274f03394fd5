use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use porter_service::{
	AssignTicketRequest, AssignTicketResponse, CreateTicketRequest, CreateTicketResponse,
	Error as ServiceError, GenerateArticleRequest, GenerateArticleResponse,
	GenerateEmbeddingRequest, GenerateEmbeddingResponse, ListTicketsRequest, ListTicketsResponse,
	RequestFeedbackRequest, RequestFeedbackResponse, RouteRequest, RouteResponse,
	SubmitFeedbackRequest, SubmitFeedbackResponse, SuggestRequest, SuggestResponse,
	UpdateTicketRequest, UpdateTicketResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/tickets", post(create_ticket).get(list_tickets))
		.route("/v1/tickets/update", post(update_ticket))
		.route("/v1/tickets/assign", post(assign_ticket))
		.route("/v1/feedback/request", post(request_feedback))
		.route("/v1/feedback/submit", post(submit_feedback))
		.route("/v1/kb/generate", post(generate_article))
		.route("/v1/embeddings", post(generate_embedding))
		.route("/v1/suggestions", post(suggest_actions))
		.route("/v1/routing", post(route_conversation))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_ticket(
	State(state): State<AppState>,
	Json(payload): Json<CreateTicketRequest>,
) -> Result<Json<CreateTicketResponse>, ApiError> {
	let response = state.service.create_ticket(payload).await?;

	Ok(Json(response))
}

async fn list_tickets(
	State(state): State<AppState>,
	Query(payload): Query<ListTicketsRequest>,
) -> Result<Json<ListTicketsResponse>, ApiError> {
	let response = state.service.list_tickets(payload).await?;

	Ok(Json(response))
}

async fn update_ticket(
	State(state): State<AppState>,
	Json(payload): Json<UpdateTicketRequest>,
) -> Result<Json<UpdateTicketResponse>, ApiError> {
	let response = state.service.update_ticket(payload).await?;

	Ok(Json(response))
}

async fn assign_ticket(
	State(state): State<AppState>,
	Json(payload): Json<AssignTicketRequest>,
) -> Result<Json<AssignTicketResponse>, ApiError> {
	let response = state.service.assign_ticket(payload).await?;

	Ok(Json(response))
}

async fn request_feedback(
	State(state): State<AppState>,
	Json(payload): Json<RequestFeedbackRequest>,
) -> Result<Json<RequestFeedbackResponse>, ApiError> {
	let response = state.service.request_feedback(payload).await?;

	Ok(Json(response))
}

async fn submit_feedback(
	State(state): State<AppState>,
	Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<Json<SubmitFeedbackResponse>, ApiError> {
	let response = state.service.submit_feedback(payload).await?;

	Ok(Json(response))
}

async fn generate_article(
	State(state): State<AppState>,
	Json(payload): Json<GenerateArticleRequest>,
) -> Result<Json<GenerateArticleResponse>, ApiError> {
	let response = state.service.generate_article(payload).await?;

	Ok(Json(response))
}

async fn generate_embedding(
	State(state): State<AppState>,
	Json(payload): Json<GenerateEmbeddingRequest>,
) -> Result<Json<GenerateEmbeddingResponse>, ApiError> {
	let response = state.service.generate_embedding(payload).await?;

	Ok(Json(response))
}

async fn suggest_actions(
	State(state): State<AppState>,
	Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
	let response = state.service.suggest_actions(payload).await?;

	Ok(Json(response))
}

async fn route_conversation(
	State(state): State<AppState>,
	Json(payload): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
	let response = state.service.route_conversation(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
			ServiceError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
			ServiceError::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
			ServiceError::Storage { .. } =>
				(StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
		};

		Self { status, error_code, message: err.to_string() }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_service_errors_to_statuses() {
		let cases = [
			(
				ServiceError::InvalidRequest { message: "bad".to_string() },
				StatusCode::BAD_REQUEST,
			),
			(ServiceError::NotFound { message: "gone".to_string() }, StatusCode::NOT_FOUND),
			(ServiceError::Conflict { message: "twice".to_string() }, StatusCode::CONFLICT),
			(ServiceError::Provider { message: "llm".to_string() }, StatusCode::BAD_GATEWAY),
			(
				ServiceError::Storage { message: "db".to_string() },
				StatusCode::INTERNAL_SERVER_ERROR,
			),
		];

		for (err, status) in cases {
			assert_eq!(ApiError::from(err).status, status);
		}
	}
}
