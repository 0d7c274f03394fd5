use time::OffsetDateTime;
use uuid::Uuid;

use porter_service::{
	AssignTicketRequest, CreateTicketRequest, Error, TicketOp, UpdateTicketRequest,
};
use porter_storage::{models::Employee, queries};

async fn create_plain_ticket(service: &porter_service::PorterService) -> Uuid {
	service
		.create_ticket(CreateTicketRequest {
			customer_email: "lee@example.com".to_string(),
			customer_name: None,
			subject: "Exported report is empty".to_string(),
			description: "The CSV export contains only headers.".to_string(),
			priority: None,
			category: None,
		})
		.await
		.expect("create_ticket failed.")
		.ticket_id
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn status_updates_enforce_lifecycle_rules() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping status_updates_enforce_lifecycle_rules; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers(serde_json::json!({}))).await;
	let ticket_id = create_plain_ticket(&service).await;

	let err = service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("sideways".to_string()),
			priority: None,
		})
		.await
		.expect_err("Unknown status should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let err = service
		.update_ticket(UpdateTicketRequest { ticket_id, status: None, priority: None })
		.await
		.expect_err("Empty update should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let resolved = service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("resolved".to_string()),
			priority: None,
		})
		.await
		.expect("Resolve failed.");

	assert_eq!(resolved.op, TicketOp::Update);

	let stored = queries::fetch_ticket(&service.db.pool, ticket_id)
		.await
		.expect("Fetch failed.")
		.expect("Ticket should exist.");

	assert!(stored.resolved_at.is_some());

	let noop = service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("resolved".to_string()),
			priority: None,
		})
		.await
		.expect("No-op update failed.");

	assert_eq!(noop.op, TicketOp::None);

	service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("closed".to_string()),
			priority: None,
		})
		.await
		.expect("Close failed.");

	let err = service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: None,
			priority: Some("urgent".to_string()),
		})
		.await
		.expect_err("Closed tickets should reject priority edits.");

	assert!(matches!(err, Error::Conflict { .. }));

	service
		.update_ticket(UpdateTicketRequest {
			ticket_id,
			status: Some("open".to_string()),
			priority: None,
		})
		.await
		.expect("Reopen failed.");

	let reopened = queries::fetch_ticket(&service.db.pool, ticket_id)
		.await
		.expect("Fetch failed.")
		.expect("Ticket should exist.");

	assert_eq!(reopened.status, "open");
	assert!(reopened.resolved_at.is_none());
	assert!(reopened.closed_at.is_none());

	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set PORTER_PG_DSN to run."]
async fn assignment_validates_employee_and_team() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping assignment_validates_employee_and_team; set PORTER_PG_DSN.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers(serde_json::json!({}))).await;
	let ticket_id = create_plain_ticket(&service).await;
	let billing = super::seed_team(&service, "Billing").await;
	let support = super::seed_team(&service, "Support").await;
	let employee = Employee {
		employee_id: Uuid::new_v4(),
		team_id: Some(billing),
		email: "ana@example.com".to_string(),
		name: "Ana".to_string(),
		role: "agent".to_string(),
		created_at: OffsetDateTime::now_utc(),
	};

	queries::insert_employee(&service.db.pool, &employee)
		.await
		.expect("Failed to seed employee.");

	let err = service
		.assign_ticket(AssignTicketRequest { ticket_id, employee_id: None, team_id: None })
		.await
		.expect_err("Empty assignment should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let err = service
		.assign_ticket(AssignTicketRequest {
			ticket_id,
			employee_id: Some(Uuid::new_v4()),
			team_id: None,
		})
		.await
		.expect_err("Unknown employee should be rejected.");

	assert!(matches!(err, Error::NotFound { .. }));

	let err = service
		.assign_ticket(AssignTicketRequest {
			ticket_id,
			employee_id: Some(employee.employee_id),
			team_id: Some(support),
		})
		.await
		.expect_err("Cross-team assignment should be rejected.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let assigned = service
		.assign_ticket(AssignTicketRequest {
			ticket_id,
			employee_id: Some(employee.employee_id),
			team_id: None,
		})
		.await
		.expect("Assignment failed.");

	// The employee's own team is inherited.
	assert_eq!(assigned.assignee_id, Some(employee.employee_id));
	assert_eq!(assigned.team_id, Some(billing));

	let requeued = service
		.assign_ticket(AssignTicketRequest {
			ticket_id,
			employee_id: None,
			team_id: Some(support),
		})
		.await
		.expect("Team assignment failed.");

	// Team-only assignment clears the assignee.
	assert_eq!(requeued.assignee_id, None);
	assert_eq!(requeued.team_id, Some(support));

	service.db.pool.close().await;

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
