use cadence_domain::ScoreSource;

/// Renders the full DDL. The three score tables come from one template so
/// they stay schema-parallel by construction.
pub fn render_schema() -> String {
	let mut sql = String::new();

	sql.push_str(USERS);
	sql.push_str(USERS_STATS);
	sql.push_str(PRIVILEGES_GROUPS);
	sql.push_str(BEATMAPS);

	for source in [ScoreSource::Vanilla, ScoreSource::Relax, ScoreSource::Legacy] {
		sql.push_str(&score_table(source.table()));
	}

	sql.push_str(FIRST_PLACES);

	sql
}

const USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
	id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
	username VARCHAR(32) NOT NULL,
	username_safe VARCHAR(32) NOT NULL UNIQUE,
	register_datetime BIGINT NOT NULL DEFAULT 0,
	privileges BIGINT UNSIGNED NOT NULL DEFAULT 0,
	latest_activity BIGINT NOT NULL DEFAULT 0,
	donor_expire BIGINT NOT NULL DEFAULT 0,
	silence_end BIGINT NOT NULL DEFAULT 0,
	silence_reason VARCHAR(255) NOT NULL DEFAULT '',
	email VARCHAR(255) NOT NULL DEFAULT '',
	notes TEXT NULL,
	ban_datetime BIGINT NOT NULL DEFAULT 0
);
";

const USERS_STATS: &str = "
CREATE TABLE IF NOT EXISTS users_stats (
	id INT NOT NULL PRIMARY KEY,
	username_aka VARCHAR(32) NULL,
	country CHAR(2) NOT NULL DEFAULT 'XX',
	userpage_content MEDIUMTEXT NULL,
	play_style INT NOT NULL DEFAULT 0,
	favourite_mode TINYINT UNSIGNED NOT NULL DEFAULT 0
);
";

const PRIVILEGES_GROUPS: &str = "
CREATE TABLE IF NOT EXISTS privileges_groups (
	id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
	name VARCHAR(32) NOT NULL UNIQUE,
	privileges BIGINT UNSIGNED NOT NULL DEFAULT 0
);
";

const BEATMAPS: &str = "
CREATE TABLE IF NOT EXISTS beatmaps (
	beatmap_id INT NOT NULL,
	beatmapset_id INT NOT NULL DEFAULT 0,
	beatmap_md5 CHAR(32) NOT NULL PRIMARY KEY,
	song_name VARCHAR(255) NOT NULL DEFAULT '',
	ar FLOAT NOT NULL DEFAULT 0,
	od FLOAT NOT NULL DEFAULT 0,
	difficulty_std FLOAT NOT NULL DEFAULT 0,
	difficulty_taiko FLOAT NOT NULL DEFAULT 0,
	difficulty_ctb FLOAT NOT NULL DEFAULT 0,
	difficulty_mania FLOAT NOT NULL DEFAULT 0,
	max_combo INT NOT NULL DEFAULT 0,
	hit_length INT NOT NULL DEFAULT 0,
	ranked TINYINT NOT NULL DEFAULT 0,
	ranked_status_freezed TINYINT(1) NOT NULL DEFAULT 0,
	latest_update BIGINT NOT NULL DEFAULT 0,
	KEY idx_beatmaps_id (beatmap_id)
);
";

// accuracy stays nullable: rows imported from the oldest score dumps have
// none, and the row decoder treats them as undecodable rather than guessing.
fn score_table(table: &str) -> String {
	format!(
		"
CREATE TABLE IF NOT EXISTS {table} (
	id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
	beatmap_md5 CHAR(32) NOT NULL,
	userid INT NOT NULL,
	score BIGINT UNSIGNED NOT NULL DEFAULT 0,
	max_combo INT NOT NULL DEFAULT 0,
	full_combo TINYINT(1) NOT NULL DEFAULT 0,
	mods INT UNSIGNED NOT NULL DEFAULT 0,
	count_300 INT NOT NULL DEFAULT 0,
	count_100 INT NOT NULL DEFAULT 0,
	count_50 INT NOT NULL DEFAULT 0,
	count_geki INT NOT NULL DEFAULT 0,
	count_katu INT NOT NULL DEFAULT 0,
	count_miss INT NOT NULL DEFAULT 0,
	time BIGINT NOT NULL DEFAULT 0,
	play_mode TINYINT UNSIGNED NOT NULL DEFAULT 0,
	accuracy DOUBLE NULL,
	pp DOUBLE NOT NULL DEFAULT 0,
	completed TINYINT UNSIGNED NOT NULL DEFAULT 0,
	KEY idx_{table}_user (userid),
	KEY idx_{table}_map (beatmap_md5)
);
"
	)
}

const FIRST_PLACES: &str = "
CREATE TABLE IF NOT EXISTS first_places (
	score_id BIGINT UNSIGNED NOT NULL,
	user_id INT NOT NULL,
	play_mode TINYINT UNSIGNED NOT NULL DEFAULT 0,
	source TINYINT UNSIGNED NOT NULL DEFAULT 0,
	beatmap_md5 CHAR(32) NOT NULL,
	PRIMARY KEY (beatmap_md5, play_mode, source),
	KEY idx_first_places_user (user_id)
);
";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_one_table_per_score_source() {
		let sql = render_schema();

		assert!(sql.contains("CREATE TABLE IF NOT EXISTS scores ("));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS scores_relax ("));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS scores_legacy ("));
	}

	#[test]
	fn statements_split_cleanly() {
		let statements =
			render_schema().split(';').filter(|s| !s.trim().is_empty()).count();

		assert_eq!(statements, 8);
	}
}
