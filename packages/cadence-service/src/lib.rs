pub mod normalize;
pub mod scores;
pub mod users;

use std::sync::Arc;

use cadence_config::Config;
use cadence_domain::{PageConfig, Param};
use cadence_providers::{
	rank::{GradeClassifier, RankClassifier},
	visibility::{PublicGate, Visibility},
};
use cadence_storage::db::Db;

pub use cadence_providers::visibility::Viewer;
pub use normalize::{Beatmap, Score, User};
pub use scores::{BeatmapScoresRequest, FirstPlacesRequest, ScoresResponse, UserScoresRequest};
pub use users::{
	LookupUser, UserIdResponse, UserListRequest, UserListResponse, UserLookupResponse,
	UserShowRequest, UserpageResponse,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	NotFound { message: String },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<cadence_storage::Error> for ServiceError {
	fn from(err: cadence_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub rank: Arc<dyn RankClassifier>,
	pub visibility: Arc<dyn Visibility>,
}

impl Providers {
	pub fn new(rank: Arc<dyn RankClassifier>, visibility: Arc<dyn Visibility>) -> Self {
		Self { rank, visibility }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { rank: Arc::new(GradeClassifier), visibility: Arc::new(PublicGate) }
	}
}

pub struct CadenceService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}

impl CadenceService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}

	pub(crate) fn list_page_config(&self) -> PageConfig {
		PageConfig {
			default_size: self.cfg.api.default_page_size,
			max_size: self.cfg.api.max_page_size,
		}
	}
}

/// Binds a rendered parameter list onto a query, in order. The composers
/// guarantee one value per placeholder.
pub(crate) fn bind_params(
	mut query: sqlx::query::Query<'_, sqlx::MySql, sqlx::mysql::MySqlArguments>,
	params: Vec<Param>,
) -> sqlx::query::Query<'_, sqlx::MySql, sqlx::mysql::MySqlArguments> {
	for param in params {
		query = match param {
			Param::Int(value) => query.bind(value),
			Param::UInt(value) => query.bind(value),
			Param::Text(value) => query.bind(value),
		};
	}

	query
}
