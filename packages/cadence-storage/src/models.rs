use sqlx::{Row, mysql::MySqlRow};

/// One `users` row joined with `users_stats`, decoded by column name from
/// the canonical user select list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
	pub id: i32,
	pub username: String,
	pub register_datetime: i64,
	pub privileges: u64,
	pub latest_activity: i64,
	pub username_aka: Option<String>,
	pub country: String,
}

/// A raw score-with-beatmap row. The beatmap side is nullable because the
/// score select LEFT JOINs `beatmaps`: a score may reference a map that no
/// longer exists.
#[derive(Debug, Clone, Default)]
pub struct ScoreRow {
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
	pub beatmap_id: Option<i32>,
	pub beatmapset_id: Option<i32>,
	pub map_md5: Option<String>,
	pub song_name: Option<String>,
	pub ar: Option<f32>,
	pub od: Option<f32>,
	pub difficulty_std: Option<f32>,
	pub difficulty_taiko: Option<f32>,
	pub difficulty_ctb: Option<f32>,
	pub difficulty_mania: Option<f32>,
	pub map_max_combo: Option<i32>,
	pub hit_length: Option<i32>,
	pub ranked: Option<i8>,
	pub ranked_status_freezed: Option<bool>,
	pub latest_update: Option<i64>,
}

impl ScoreRow {
	/// Decodes a row positionally, in exactly the order of
	/// `cadence_domain::source::SCORE_COLUMNS`. The score and beatmap sides
	/// share column names (`max_combo`, `beatmap_md5`), so decoding by name
	/// is not an option here.
	pub fn decode(row: &MySqlRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			id: row.try_get(0)?,
			beatmap_md5: row.try_get(1)?,
			score: row.try_get(2)?,
			max_combo: row.try_get(3)?,
			full_combo: row.try_get(4)?,
			mods: row.try_get(5)?,
			count_300: row.try_get(6)?,
			count_100: row.try_get(7)?,
			count_50: row.try_get(8)?,
			count_geki: row.try_get(9)?,
			count_katu: row.try_get(10)?,
			count_miss: row.try_get(11)?,
			time: row.try_get(12)?,
			play_mode: row.try_get(13)?,
			accuracy: row.try_get(14)?,
			pp: row.try_get(15)?,
			completed: row.try_get(16)?,
			beatmap_id: row.try_get(17)?,
			beatmapset_id: row.try_get(18)?,
			map_md5: row.try_get(19)?,
			song_name: row.try_get(20)?,
			ar: row.try_get(21)?,
			od: row.try_get(22)?,
			difficulty_std: row.try_get(23)?,
			difficulty_taiko: row.try_get(24)?,
			difficulty_ctb: row.try_get(25)?,
			difficulty_mania: row.try_get(26)?,
			map_max_combo: row.try_get(27)?,
			hit_length: row.try_get(28)?,
			ranked: row.try_get(29)?,
			ranked_status_freezed: row.try_get(30)?,
			latest_update: row.try_get(31)?,
		})
	}
}
