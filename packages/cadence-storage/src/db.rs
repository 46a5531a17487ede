use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: MySqlPool,
}
impl Db {
	pub async fn connect(cfg: &cadence_config::MySql) -> Result<Self> {
		let pool =
			MySqlPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Creates any missing tables. Every statement is idempotent; there is
	/// no migration machinery beyond this.
	pub async fn ensure_schema(&self) -> Result<()> {
		for statement in schema::render_schema().split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&self.pool).await?;
		}

		Ok(())
	}
}
