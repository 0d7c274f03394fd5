use std::sync::Arc;

use porter_service::PorterService;
use porter_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PorterService>,
}
impl AppState {
	pub async fn new(config: porter_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.vector_dim).await?;

		let service = PorterService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: Arc<PorterService>) -> Self {
		Self { service }
	}
}
