use porter_service::{RouteDecision, RouteRequest};

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn routing_prefers_intents_then_falls_back() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping routing_prefers_intents_then_falls_back; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(
		cfg.clone(),
		super::stub_providers(serde_json::json!({ "team": "Support" })),
	)
	.await;
	let billing = super::seed_team(&service, "Billing").await;
	let support = super::seed_team(&service, "Support").await;

	super::seed_intent(&service, billing, "Invoice is overdue or charged twice").await;
	super::seed_intent(&service, support, "Application crashes on startup").await;

	let routed = service
		.route_conversation(RouteRequest {
			message: "My invoice looks wrong this month".to_string(),
			customer_id: None,
		})
		.await
		.expect("Routing failed.");

	assert_eq!(routed.team_id, billing);
	assert_eq!(routed.decided_by, RouteDecision::Intent);
	assert_eq!(routed.matched_phrase.as_deref(), Some("Invoice is overdue or charged twice"));

	let weak = service
		.route_conversation(RouteRequest {
			message: "I would like to change my plan".to_string(),
			customer_id: None,
		})
		.await
		.expect("Fallback routing failed.");

	// No intent clears the similarity bar, so the generation provider
	// picks from the roster.
	assert_eq!(weak.team_id, support);
	assert_eq!(weak.decided_by, RouteDecision::Llm);
	assert_eq!(weak.confidence, None);

	// With an unusable generation answer the configured fallback team
	// takes over.
	let mut fallback_cfg = cfg;

	fallback_cfg.routing.fallback_team = Some("Billing".to_string());

	let fallback_service = super::build_service(
		fallback_cfg,
		super::stub_providers(serde_json::json!({ "verdict": "unsure" })),
	)
	.await;
	let fallback = fallback_service
		.route_conversation(RouteRequest {
			message: "I would like to change my plan".to_string(),
			customer_id: None,
		})
		.await
		.expect("Fallback team routing failed.");

	assert_eq!(fallback.team_id, billing);
	assert_eq!(fallback.decided_by, RouteDecision::Fallback);

	fallback_service.db.pool.close().await;
	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
