use std::sync::Arc;

use cadence_service::CadenceService;
use cadence_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CadenceService>,
}
impl AppState {
	pub async fn new(config: cadence_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.mysql).await?;

		db.ensure_schema().await?;

		let service = CadenceService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
