mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Api, Config, MySql, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.mysql.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.mysql.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.mysql.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.mysql.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.api.max_page_size == 0 {
		return Err(Error::Validation {
			message: "api.max_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.api.default_page_size == 0 || cfg.api.default_page_size > cfg.api.max_page_size {
		return Err(Error::Validation {
			message: "api.default_page_size must be in the range 1..=api.max_page_size.".to_string(),
		});
	}
	if cfg.api.first_places_max_page_size == 0 {
		return Err(Error::Validation {
			message: "api.first_places_max_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.api.lookup_limit == 0 {
		return Err(Error::Validation {
			message: "api.lookup_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.api.beatmap_scores_max_limit == 0 {
		return Err(Error::Validation {
			message: "api.beatmap_scores_max_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.api.beatmap_scores_default_limit == 0
		|| cfg.api.beatmap_scores_default_limit > cfg.api.beatmap_scores_max_limit
	{
		return Err(Error::Validation {
			message: "api.beatmap_scores_default_limit must be in the range 1..=api.beatmap_scores_max_limit."
				.to_string(),
		});
	}

	Ok(())
}
