/// The three historical score partitions. The tables are schema-parallel —
/// identical logical columns, distinct physical names — because score data
/// was split by gameplay variant rather than unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
	Vanilla,
	Relax,
	Legacy,
}

/// Canonical score select list. Rows fetched through any of the three
/// sources are decoded positionally in exactly this order; keep it in sync
/// with `ScoreRow::decode`.
pub const SCORE_COLUMNS: &str = "\
s.id, s.beatmap_md5, s.score, s.max_combo, s.full_combo, s.mods, \
s.count_300, s.count_100, s.count_50, s.count_geki, s.count_katu, s.count_miss, \
s.time, s.play_mode, s.accuracy, s.pp, s.completed, \
b.beatmap_id, b.beatmapset_id, b.beatmap_md5, b.song_name, b.ar, b.od, \
b.difficulty_std, b.difficulty_taiko, b.difficulty_ctb, b.difficulty_mania, \
b.max_combo, b.hit_length, b.ranked, b.ranked_status_freezed, b.latest_update";

impl ScoreSource {
	/// Flag values 0/1/2. Anything else, including an absent flag, degrades
	/// to Vanilla rather than erroring: old clients send junk here, and
	/// rejecting them would break compatibility.
	pub fn from_flag(flag: Option<i64>) -> Self {
		match flag {
			Some(1) => Self::Relax,
			Some(2) => Self::Legacy,
			_ => Self::Vanilla,
		}
	}

	/// Source resolution with the historical `rx` parameter: when the
	/// source flag is absent, `rx=1` still selects Relax.
	pub fn from_flags(flag: Option<i64>, rx: Option<i64>) -> Self {
		match flag {
			Some(_) => Self::from_flag(flag),
			None if rx.unwrap_or(0) > 0 => Self::Relax,
			None => Self::Vanilla,
		}
	}

	pub fn flag(self) -> i64 {
		match self {
			Self::Vanilla => 0,
			Self::Relax => 1,
			Self::Legacy => 2,
		}
	}

	pub fn table(self) -> &'static str {
		match self {
			Self::Vanilla => "scores",
			Self::Relax => "scores_relax",
			Self::Legacy => "scores_legacy",
		}
	}

	/// The shared SELECT over this variant's table. Beatmaps are LEFT
	/// JOINed — scores may reference maps that no longer exist — and users
	/// are joined so visibility predicates can apply.
	pub fn select_base(self) -> String {
		format!(
			"SELECT {} FROM {} AS s \
			LEFT JOIN beatmaps AS b ON b.beatmap_md5 = s.beatmap_md5 \
			INNER JOIN users ON users.id = s.userid",
			SCORE_COLUMNS,
			self.table(),
		)
	}

	/// As `select_base`, entered through the `first_places` table so only
	/// scores currently holding #1 on their map are returned.
	pub fn select_first_base(self) -> String {
		format!(
			"SELECT {} FROM first_places AS fp \
			INNER JOIN {} AS s ON s.id = fp.score_id \
			LEFT JOIN beatmaps AS b ON b.beatmap_md5 = s.beatmap_md5 \
			INNER JOIN users ON users.id = s.userid",
			SCORE_COLUMNS,
			self.table(),
		)
	}
}
