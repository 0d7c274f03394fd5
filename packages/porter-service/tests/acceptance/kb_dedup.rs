use porter_service::{CreateTicketRequest, GenerateArticleRequest, UpdateTicketRequest};

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn article_generation_reuses_near_duplicates() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping article_generation_reuses_near_duplicates; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let article = serde_json::json!({
		"title": "Reset your password",
		"body": "Use the reset link from the sign in page and follow the email.",
		"tags": ["account"],
	});
	let service = super::build_service(cfg, super::stub_providers(article)).await;
	let ticket_id = service
		.create_ticket(CreateTicketRequest {
			customer_email: "sam@example.com".to_string(),
			customer_name: None,
			subject: "Cannot reset password".to_string(),
			description: "The password reset flow loops forever.".to_string(),
			priority: None,
			category: None,
		})
		.await
		.expect("create_ticket failed.")
		.ticket_id;

	service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("resolved".to_string()),
			priority: None,
		})
		.await
		.expect("Resolve failed.");

	let first = service
		.generate_article(GenerateArticleRequest { ticket_id })
		.await
		.expect("First generation failed.");

	assert!(first.created);
	assert_eq!(first.title, "Reset your password");

	let second = service
		.generate_article(GenerateArticleRequest { ticket_id })
		.await
		.expect("Second generation failed.");

	// The identical article embeds to the same vector, so the dedup gate
	// returns the stored row instead of inserting a twin.
	assert!(!second.created);
	assert_eq!(second.article_id, first.article_id);

	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
