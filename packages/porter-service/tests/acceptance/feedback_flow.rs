use uuid::Uuid;

use porter_service::{
	CreateTicketRequest, Error, RequestFeedbackRequest, SubmitFeedbackRequest, UpdateTicketRequest,
};
use porter_storage::queries;

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn feedback_round_trip_is_idempotent_and_single_shot() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping feedback_round_trip_is_idempotent_and_single_shot; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers(serde_json::json!({}))).await;
	let ticket_id = service
		.create_ticket(CreateTicketRequest {
			customer_email: "maya@example.com".to_string(),
			customer_name: Some("Maya".to_string()),
			subject: "Sync keeps failing".to_string(),
			description: "Calendar sync stops after an hour.".to_string(),
			priority: None,
			category: None,
		})
		.await
		.expect("create_ticket failed.")
		.ticket_id;

	let err = service
		.request_feedback(RequestFeedbackRequest { ticket_id })
		.await
		.expect_err("Open tickets should not accept feedback requests.");

	assert!(matches!(err, Error::Conflict { .. }));

	service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("resolved".to_string()),
			priority: None,
		})
		.await
		.expect("Resolve failed.");

	let first = service
		.request_feedback(RequestFeedbackRequest { ticket_id })
		.await
		.expect("Feedback request failed.");
	let second = service
		.request_feedback(RequestFeedbackRequest { ticket_id })
		.await
		.expect("Second feedback request failed.");

	assert_eq!(first.token, second.token);

	let err = service
		.submit_feedback(SubmitFeedbackRequest { token: first.token, rating: 9, comment: None })
		.await
		.expect_err("Out-of-range ratings should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let err = service
		.submit_feedback(SubmitFeedbackRequest { token: Uuid::new_v4(), rating: 4, comment: None })
		.await
		.expect_err("Unknown tokens should be rejected.");

	assert!(matches!(err, Error::NotFound { .. }));

	let submitted = service
		.submit_feedback(SubmitFeedbackRequest {
			token: first.token,
			rating: 5,
			comment: Some("Quick and helpful.".to_string()),
		})
		.await
		.expect("Submission failed.");

	assert_eq!(submitted.ticket_id, ticket_id);

	let stored = queries::fetch_ticket(&service.db.pool, ticket_id)
		.await
		.expect("Fetch failed.")
		.expect("Ticket should exist.");

	assert_eq!(stored.satisfaction_rating, Some(5));

	let err = service
		.submit_feedback(SubmitFeedbackRequest { token: first.token, rating: 3, comment: None })
		.await
		.expect_err("Double submission should be rejected.");

	assert!(matches!(err, Error::Conflict { .. }));

	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
