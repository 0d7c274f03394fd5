mod acceptance {
	mod feedback_flow;
	mod kb_dedup;
	mod lifecycle;
	mod routing;
	mod triage;

	use std::sync::Arc;

	use serde_json::{Map, Value};
	use time::OffsetDateTime;
	use uuid::Uuid;

	use porter_service::{
		BoxFuture, EmbeddingProvider, GenerationProvider, PorterService, Providers,
	};
	use porter_storage::{
		db::Db,
		models::{Team, TeamIntent, Ticket},
		queries,
	};
	use porter_testkit::TestDatabase;

	pub const TEST_VECTOR_DIM: u32 = 4;

	pub async fn test_db() -> Option<TestDatabase> {
		let base_dsn = porter_testkit::env_dsn()?;
		let db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

		Some(db)
	}

	pub fn test_config(dsn: String) -> porter_config::Config {
		porter_config::Config {
			service: porter_config::Service {
				http_bind: "127.0.0.1:0".to_string(),
				log_level: "info".to_string(),
			},
			storage: porter_config::Storage {
				vector_dim: TEST_VECTOR_DIM,
				postgres: porter_config::Postgres { dsn, pool_max_conns: 2 },
			},
			providers: porter_config::Providers {
				embedding: porter_config::EmbeddingProviderConfig {
					provider_id: "stub".to_string(),
					api_base: "http://localhost".to_string(),
					api_key: "key".to_string(),
					path: "/v1/embeddings".to_string(),
					model: "stub-embedding".to_string(),
					dimensions: TEST_VECTOR_DIM,
					timeout_ms: 1_000,
					default_headers: Map::new(),
				},
				generation: porter_config::GenerationProviderConfig {
					provider_id: "stub".to_string(),
					api_base: "http://localhost".to_string(),
					api_key: "key".to_string(),
					path: "/v1/chat/completions".to_string(),
					model: "stub-generation".to_string(),
					temperature: 0.2,
					timeout_ms: 1_000,
					default_headers: Map::new(),
				},
			},
			tickets: porter_config::Tickets {
				default_priority: "normal".to_string(),
				triage: porter_config::Triage {
					enabled: true,
					candidate_limit: 20,
					min_score: 0.25,
					reassign_margin: 0.15,
				},
			},
			kb: porter_config::Kb { dup_sim_threshold: 0.9 },
			suggestions: porter_config::Suggestions {
				cache_ttl_seconds: 300,
				sweep_interval_seconds: 60,
				max_actions: 5,
			},
			routing: porter_config::Routing {
				candidate_limit: 16,
				min_score: 0.3,
				fallback_team: None,
			},
			feedback: porter_config::Feedback { token_ttl_days: 14 },
		}
	}

	pub async fn build_service(cfg: porter_config::Config, providers: Providers) -> PorterService {
		let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect.");

		db.ensure_schema(cfg.storage.vector_dim).await.expect("Failed to bootstrap schema.");

		PorterService::with_providers(cfg, db, providers)
	}

	pub fn stub_providers(generation_payload: Value) -> Providers {
		Providers::new(
			Arc::new(StubEmbedding),
			Arc::new(CannedGeneration { payload: generation_payload }),
		)
	}

	/// Deterministic embeddings: texts about the same topic land on the
	/// same axis, so cosine similarity is 1 inside a topic and 0 across
	/// topics.
	pub struct StubEmbedding;
	impl EmbeddingProvider for StubEmbedding {
		fn embed<'a>(
			&'a self,
			cfg: &'a porter_config::EmbeddingProviderConfig,
			texts: &'a [String],
		) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
			let vectors =
				texts.iter().map(|text| topic_vector(text, cfg.dimensions as usize)).collect();

			Box::pin(async move { Ok(vectors) })
		}
	}

	pub struct CannedGeneration {
		pub payload: Value,
	}
	impl GenerationProvider for CannedGeneration {
		fn complete_json<'a>(
			&'a self,
			_cfg: &'a porter_config::GenerationProviderConfig,
			_messages: &'a [Value],
		) -> BoxFuture<'a, color_eyre::Result<Value>> {
			let payload = self.payload.clone();

			Box::pin(async move { Ok(payload) })
		}
	}

	pub fn topic_vector(text: &str, dimensions: usize) -> Vec<f32> {
		let mut vector = vec![0.0; dimensions.max(4)];
		let lowered = text.to_lowercase();

		if lowered.contains("password") || lowered.contains("sign in") {
			vector[0] = 1.0;
		} else if lowered.contains("invoice") || lowered.contains("billing") {
			vector[1] = 1.0;
		} else if lowered.contains("crash") || lowered.contains("error") {
			vector[2] = 1.0;
		} else {
			vector[3] = 1.0;
		}

		vector
	}

	pub async fn seed_resolved_ticket(
		service: &PorterService,
		subject: &str,
		description: &str,
		category: &str,
	) -> Uuid {
		let now = OffsetDateTime::now_utc();
		let customer =
			queries::find_or_create_customer(&service.db.pool, "seed@example.com", "Seed", now)
				.await
				.expect("Failed to seed customer.");
		let ticket = Ticket {
			ticket_id: Uuid::new_v4(),
			customer_id: customer.customer_id,
			subject: subject.to_string(),
			description: description.to_string(),
			status: "resolved".to_string(),
			priority: "normal".to_string(),
			category: Some(category.to_string()),
			assignee_id: None,
			team_id: None,
			satisfaction_rating: None,
			created_at: now,
			updated_at: now,
			resolved_at: Some(now),
			closed_at: None,
		};

		queries::insert_ticket(&service.db.pool, &ticket)
			.await
			.expect("Failed to seed ticket.");

		let vector =
			topic_vector(&format!("{subject}\n\n{description}"), TEST_VECTOR_DIM as usize);

		queries::upsert_ticket_embedding(
			&service.db.pool,
			ticket.ticket_id,
			"stub-embedding",
			&vector,
			now,
		)
		.await
		.expect("Failed to seed embedding.");

		ticket.ticket_id
	}

	pub async fn seed_team(service: &PorterService, name: &str) -> Uuid {
		let team = Team {
			team_id: Uuid::new_v4(),
			name: name.to_string(),
			description: None,
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_team(&service.db.pool, &team).await.expect("Failed to seed team.");

		team.team_id
	}

	/// Seeds an intent phrase and runs it through the embedding endpoint,
	/// the same path production uses to vectorize intents.
	pub async fn seed_intent(service: &PorterService, team_id: Uuid, phrase: &str) -> Uuid {
		let intent = TeamIntent {
			intent_id: Uuid::new_v4(),
			team_id,
			phrase: phrase.to_string(),
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_team_intent(&service.db.pool, &intent)
			.await
			.expect("Failed to seed intent.");

		service
			.generate_embedding(porter_service::GenerateEmbeddingRequest {
				source_type: porter_service::EmbeddingSource::Intent,
				source_id: intent.intent_id,
			})
			.await
			.expect("Failed to embed intent.");

		intent.intent_id
	}
}
