mod error;

pub use error::{Error, Result};

use std::{env, future::Future, str::FromStr, thread};

use sqlx::{
	Connection, Executor,
	mysql::{MySqlConnectOptions, MySqlConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

/// One disposable MySQL database, created on `new` and dropped on
/// `cleanup` (or best-effort on `Drop`).
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: MySqlConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = MySqlConnectOptions::from_str(base_dsn).map_err(|err| {
			Error::Message(format!("Failed to parse CADENCE_MYSQL_DSN: {err}."))
		})?;
		let admin_options = base_options.clone().database("mysql");
		let mut admin_conn = MySqlConnection::connect_with(&admin_options).await.map_err(
			|err| Error::Message(format!("Failed to connect to the admin database: {err}.")),
		)?;
		let name = format!("cadence_test_{}", Uuid::new_v4().simple());
		let create_sql = format!("CREATE DATABASE `{name}`");

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = {
			use sqlx::ConnectOptions;

			base_options.database(&name).to_url_lossy().to_string()
		};

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		drop_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test database cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(drop_database(&name, &admin_options)) {
				eprintln!("Test database cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var("CADENCE_MYSQL_DSN").ok()
}

pub async fn with_test_db<F, Fut, T>(base_dsn: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestDatabase) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let db = TestDatabase::new(base_dsn).await?;
	let result = f(&db).await;
	let mut db = db;

	if let Err(err) = db.cleanup_inner().await {
		eprintln!("Test database cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

async fn drop_database(name: &str, admin_options: &MySqlConnectOptions) -> Result<()> {
	let mut conn = MySqlConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to the admin database for cleanup: {err}."))
	})?;
	let drop_sql = format!("DROP DATABASE IF EXISTS `{name}`");

	conn.execute(drop_sql.as_str())
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}
