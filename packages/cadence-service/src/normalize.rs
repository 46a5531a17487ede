use cadence_providers::rank::RankClassifier;
use cadence_storage::models::{ScoreRow, UserRow};
use sqlx::mysql::MySqlRow;

use crate::CadenceService;

/// Canonical user record: flat and fully populated, no nullable relational
/// artifacts left.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct User {
	pub id: i32,
	pub username: String,
	pub username_aka: String,
	pub registered_on: i64,
	pub privileges: u64,
	pub latest_activity: i64,
	pub country: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Beatmap {
	pub beatmap_id: i32,
	pub beatmapset_id: i32,
	pub beatmap_md5: String,
	pub song_name: String,
	pub ar: f32,
	pub od: f32,
	pub difficulty: f32,
	pub difficulty_std: f32,
	pub difficulty_taiko: f32,
	pub difficulty_ctb: f32,
	pub difficulty_mania: f32,
	pub max_combo: i32,
	pub hit_length: i32,
	pub ranked: i8,
	pub ranked_status_freezed: bool,
	pub latest_update: i64,
}

/// Canonical score record with its beatmap embedded and the derived rank
/// label attached.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Score {
	pub id: u64,
	pub beatmap_md5: String,
	pub score: u64,
	pub max_combo: i32,
	pub full_combo: bool,
	pub mods: u32,
	pub count_300: i32,
	pub count_100: i32,
	pub count_50: i32,
	pub count_geki: i32,
	pub count_katu: i32,
	pub count_miss: i32,
	pub time: i64,
	pub play_mode: u8,
	pub accuracy: f64,
	pub pp: f64,
	pub completed: u8,
	pub rank: String,
	pub beatmap: Beatmap,
}

pub(crate) fn user(row: UserRow) -> User {
	User {
		id: row.id,
		username: row.username,
		username_aka: row.username_aka.unwrap_or_default(),
		registered_on: row.register_datetime,
		privileges: row.privileges,
		latest_activity: row.latest_activity,
		country: row.country,
	}
}

/// Normalizes one raw row into the canonical record. Nullable beatmap
/// fields resolve to sentinels (id 0, empty strings, zeroed numbers) so
/// nothing downstream has to special-case an absent map.
pub(crate) fn score(row: ScoreRow, classifier: &dyn RankClassifier) -> Score {
	let rank = classifier
		.classify(
			row.play_mode,
			row.mods,
			row.accuracy,
			row.count_300,
			row.count_100,
			row.count_50,
			row.count_miss,
		)
		.to_uppercase();
	let difficulty_std = row.difficulty_std.unwrap_or(0.0);
	let beatmap = Beatmap {
		beatmap_id: row.beatmap_id.unwrap_or(0),
		beatmapset_id: row.beatmapset_id.unwrap_or(0),
		beatmap_md5: row.map_md5.unwrap_or_default(),
		song_name: row.song_name.unwrap_or_default(),
		ar: row.ar.unwrap_or(0.0),
		od: row.od.unwrap_or(0.0),
		difficulty: difficulty_std,
		difficulty_std,
		difficulty_taiko: row.difficulty_taiko.unwrap_or(0.0),
		difficulty_ctb: row.difficulty_ctb.unwrap_or(0.0),
		difficulty_mania: row.difficulty_mania.unwrap_or(0.0),
		max_combo: row.map_max_combo.unwrap_or(0),
		hit_length: row.hit_length.unwrap_or(0),
		ranked: row.ranked.unwrap_or(0),
		ranked_status_freezed: row.ranked_status_freezed.unwrap_or(false),
		latest_update: row.latest_update.unwrap_or(0),
	};

	Score {
		id: row.id,
		beatmap_md5: row.beatmap_md5,
		score: row.score,
		max_combo: row.max_combo,
		full_combo: row.full_combo,
		mods: row.mods,
		count_300: row.count_300,
		count_100: row.count_100,
		count_50: row.count_50,
		count_geki: row.count_geki,
		count_katu: row.count_katu,
		count_miss: row.count_miss,
		time: row.time,
		play_mode: row.play_mode,
		accuracy: row.accuracy,
		pp: row.pp,
		completed: row.completed,
		rank,
		beatmap,
	}
}

impl CadenceService {
	/// Decodes and normalizes a fetched row set. A row that fails to decode
	/// is skipped with a warning so the rest of the listing still goes out.
	pub(crate) fn collect_scores(&self, rows: &[MySqlRow]) -> Vec<Score> {
		let mut scores = Vec::with_capacity(rows.len());

		for row in rows {
			match ScoreRow::decode(row) {
				Ok(raw) => scores.push(score(raw, self.providers.rank.as_ref())),
				Err(err) => tracing::warn!(%err, "Skipping undecodable score row."),
			}
		}

		scores
	}
}
