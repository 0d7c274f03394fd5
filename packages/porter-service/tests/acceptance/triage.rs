use porter_domain::status::{TicketPriority, TicketStatus};
use porter_service::CreateTicketRequest;

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn create_ticket_reassigns_category_by_similarity() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_ticket_reassigns_category_by_similarity; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers(serde_json::json!({}))).await;

	super::seed_resolved_ticket(
		&service,
		"Password reset loop",
		"Customer cannot reset their password.",
		"account_access",
	)
	.await;
	super::seed_resolved_ticket(
		&service,
		"Sign in fails after password change",
		"Changing the password locks the account.",
		"account_access",
	)
	.await;
	super::seed_resolved_ticket(
		&service,
		"Invoice charged twice",
		"Duplicate invoice on the last billing cycle.",
		"billing",
	)
	.await;

	let response = service
		.create_ticket(CreateTicketRequest {
			customer_email: "kim@example.com".to_string(),
			customer_name: Some("Kim".to_string()),
			subject: "Cannot reset my password".to_string(),
			description: "The password reset email never arrives.".to_string(),
			priority: None,
			category: Some("billing".to_string()),
		})
		.await
		.expect("create_ticket failed.");

	// Two strong account_access matches outweigh the requested billing
	// category, whose only candidate is orthogonal to the query.
	assert!(response.category_reassigned);
	assert_eq!(response.category.as_deref(), Some("account_access"));
	assert_eq!(response.status, TicketStatus::Open);
	assert_eq!(response.priority, TicketPriority::Normal);

	let unlabeled = service
		.create_ticket(CreateTicketRequest {
			customer_email: "kim@example.com".to_string(),
			customer_name: None,
			subject: "Password reset link expired".to_string(),
			description: "The password link says it is no longer valid.".to_string(),
			priority: Some("high".to_string()),
			category: None,
		})
		.await
		.expect("create_ticket failed.");

	assert!(unlabeled.category_reassigned);
	assert_eq!(unlabeled.category.as_deref(), Some("account_access"));
	assert_eq!(unlabeled.priority, TicketPriority::High);

	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
