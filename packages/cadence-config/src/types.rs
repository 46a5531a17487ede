use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub api: Api,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub mysql: MySql,
}

#[derive(Debug, Deserialize)]
pub struct MySql {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Listing and lookup limits. Every ceiling the request composers clamp
/// against lives here so deployments can tune them without code changes.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Api {
	/// Page size used when the caller does not ask for one.
	pub default_page_size: u32,
	/// Hard ceiling for user and score listings.
	pub max_page_size: u32,
	/// Hard ceiling for the first-places listing.
	pub first_places_max_page_size: u32,
	/// Row cap for the username lookup endpoint.
	pub lookup_limit: u32,
	pub beatmap_scores_default_limit: u32,
	pub beatmap_scores_max_limit: u32,
}
impl Default for Api {
	fn default() -> Self {
		Self {
			default_page_size: 50,
			max_page_size: 100,
			first_places_max_page_size: 50,
			lookup_limit: 25,
			beatmap_scores_default_limit: 50,
			beatmap_scores_max_limit: 100,
		}
	}
}
