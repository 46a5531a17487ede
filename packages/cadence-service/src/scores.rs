use cadence_domain::{Filter, PageConfig, ScoreSource, names::safe_username, paginate};

use crate::{
	CadenceService, ServiceError, ServiceResult, Viewer, bind_params, normalize::Score,
	users::user_clause,
};

/// A completed, ranked pass; lower values are fails and retries.
const COMPLETED_BEST: u8 = 3;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UserScoresRequest {
	pub id: Option<String>,
	pub name: Option<String>,
	pub mode: Option<u8>,
	pub source: Option<i64>,
	pub rx: Option<i64>,
	pub page: Option<String>,
	pub length: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FirstPlacesRequest {
	pub user_id: Option<i64>,
	pub mode: Option<u8>,
	pub source: Option<i64>,
	pub rx: Option<i64>,
	pub page: Option<String>,
	pub length: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BeatmapScoresRequest {
	pub beatmap_id: Option<i64>,
	pub user_id: Option<i64>,
	pub name: Option<String>,
	pub mods: Option<u64>,
	pub mode: Option<u8>,
	pub source: Option<i64>,
	pub rx: Option<i64>,
	pub limit: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScoresResponse {
	pub scores: Vec<Score>,
}

impl CadenceService {
	/// A user's best scores, ordered by performance then raw score.
	pub async fn user_best_scores(
		&self,
		viewer: &Viewer,
		req: &UserScoresRequest,
	) -> ServiceResult<ScoresResponse> {
		let (clause, param) =
			user_clause(viewer, "users", req.id.as_deref(), req.name.as_deref())?;
		let source = ScoreSource::from_flags(req.source, req.rx);
		let (where_sql, params) = Filter::new()
			.eq(&clause, Some(param))
			.eq("s.completed = ?", Some(COMPLETED_BEST))
			.eq("s.play_mode = ?", req.mode)
			.render();
		let window =
			paginate(&self.list_page_config(), req.page.as_deref(), req.length.as_deref());
		let sql = format!(
			"{} WHERE {where_sql} AND {} ORDER BY s.pp DESC, s.score DESC {}",
			source.select_base(),
			self.providers.visibility.user_clause(viewer),
			window.clause(),
		);
		let rows = bind_params(sqlx::query(&sql), params).fetch_all(&self.db.pool).await?;

		Ok(ScoresResponse { scores: self.collect_scores(&rows) })
	}

	/// A user's latest scores, passes and fails alike.
	pub async fn user_recent_scores(
		&self,
		viewer: &Viewer,
		req: &UserScoresRequest,
	) -> ServiceResult<ScoresResponse> {
		let (clause, param) =
			user_clause(viewer, "users", req.id.as_deref(), req.name.as_deref())?;
		let source = ScoreSource::from_flags(req.source, req.rx);
		let (where_sql, params) =
			Filter::new().eq(&clause, Some(param)).eq("s.play_mode = ?", req.mode).render();
		let window =
			paginate(&self.list_page_config(), req.page.as_deref(), req.length.as_deref());
		let sql = format!(
			"{} WHERE {where_sql} AND {} ORDER BY s.id DESC {}",
			source.select_base(),
			self.providers.visibility.user_clause(viewer),
			window.clause(),
		);
		let rows = bind_params(sqlx::query(&sql), params).fetch_all(&self.db.pool).await?;

		Ok(ScoresResponse { scores: self.collect_scores(&rows) })
	}

	/// The scores with which a user currently holds #1 on their map.
	pub async fn user_first_places(
		&self,
		viewer: &Viewer,
		req: &FirstPlacesRequest,
	) -> ServiceResult<ScoresResponse> {
		let Some(user_id) = req.user_id else {
			return Err(ServiceError::InvalidRequest { message: "Pass a user id.".to_string() });
		};
		let source = ScoreSource::from_flags(req.source, req.rx);
		let (where_sql, params) = Filter::new()
			.eq("fp.user_id = ?", Some(user_id))
			.eq("fp.play_mode = ?", Some(req.mode.unwrap_or(0)))
			.eq("fp.source = ?", Some(source.flag()))
			.render();
		let window = paginate(
			&PageConfig {
				default_size: self
					.cfg
					.api
					.default_page_size
					.min(self.cfg.api.first_places_max_page_size),
				max_size: self.cfg.api.first_places_max_page_size,
			},
			req.page.as_deref(),
			req.length.as_deref(),
		);
		let sql = format!(
			"{} WHERE {where_sql} AND {} ORDER BY s.pp DESC, s.score DESC {}",
			source.select_first_base(),
			self.providers.visibility.user_clause(viewer),
			window.clause(),
		);
		let rows = bind_params(sqlx::query(&sql), params).fetch_all(&self.db.pool).await?;

		Ok(ScoresResponse { scores: self.collect_scores(&rows) })
	}

	/// The top scores on one beatmap, optionally filtered to a single user
	/// and an exact modifier combination.
	pub async fn beatmap_scores(
		&self,
		viewer: &Viewer,
		req: &BeatmapScoresRequest,
	) -> ServiceResult<ScoresResponse> {
		let Some(beatmap_id) = req.beatmap_id else {
			return Err(ServiceError::InvalidRequest {
				message: "Pass a beatmap id.".to_string(),
			});
		};
		let md5: Option<String> =
			sqlx::query_scalar("SELECT beatmap_md5 FROM beatmaps WHERE beatmap_id = ? LIMIT 1")
				.bind(beatmap_id)
				.fetch_optional(&self.db.pool)
				.await?;
		let Some(md5) = md5 else {
			return Err(ServiceError::NotFound { message: "No such beatmap.".to_string() });
		};
		let mode = req.mode.unwrap_or(0);
		let source = ScoreSource::from_flags(req.source, req.rx);
		let (where_sql, params) = Filter::new()
			.eq("s.beatmap_md5 = ?", Some(md5))
			.eq("s.completed = ?", Some(COMPLETED_BEST))
			.eq("s.play_mode = ?", Some(mode))
			.mask_exact("s.mods & ? = ?", Some(req.mods.unwrap_or(0)))
			.eq("users.username_safe = ?", req.name.as_deref().map(safe_username))
			.eq("users.id = ?", req.user_id)
			.render();
		let order =
			if ranked_by_pp(mode) { "ORDER BY s.pp DESC" } else { "ORDER BY s.score DESC" };
		let window = paginate(
			&PageConfig {
				default_size: self.cfg.api.beatmap_scores_default_limit,
				max_size: self.cfg.api.beatmap_scores_max_limit,
			},
			None,
			req.limit.as_deref(),
		);
		let sql = format!(
			"{} WHERE {where_sql} AND {} {order} {}",
			source.select_base(),
			self.providers.visibility.user_clause(viewer),
			window.clause(),
		);
		let rows = bind_params(sqlx::query(&sql), params).fetch_all(&self.db.pool).await?;

		Ok(ScoresResponse { scores: self.collect_scores(&rows) })
	}
}

/// Catch has no performance-point ranking; its leaderboards order by score.
fn ranked_by_pp(mode: u8) -> bool {
	mode != 2
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catch_orders_by_score_everything_else_by_pp() {
		assert!(ranked_by_pp(0));
		assert!(ranked_by_pp(1));
		assert!(!ranked_by_pp(2));
		assert!(ranked_by_pp(3));
	}
}
