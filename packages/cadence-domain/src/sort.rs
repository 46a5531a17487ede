/// Per-endpoint sorting policy: which columns a caller may sort by, what to
/// fall back to, and the table qualifier prefixed to validated columns.
#[derive(Debug, Clone, Copy)]
pub struct SortConfig {
	pub allowed: &'static [&'static str],
	pub default_clause: &'static str,
	pub table: &'static str,
}

/// Composes an ORDER BY clause from an untrusted `sort` parameter of the
/// form `column` or `column,direction`. The column is matched
/// case-sensitively against the allow-list; anything else falls back to the
/// configured default, rendered verbatim. Unknown directions degrade to
/// descending.
pub fn order_by(cfg: &SortConfig, requested: Option<&str>) -> String {
	let Some(raw) = requested else {
		return format!("ORDER BY {}", cfg.default_clause);
	};
	let mut parts = raw.splitn(2, ',');
	let column = parts.next().unwrap_or("").trim();
	let direction = match parts.next().map(str::trim) {
		Some("asc") => "ASC",
		_ => "DESC",
	};

	if cfg.allowed.contains(&column) {
		format!("ORDER BY {}.{column} {direction}", cfg.table)
	} else {
		format!("ORDER BY {}", cfg.default_clause)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CONFIG: SortConfig = SortConfig {
		allowed: &["id", "username", "latest_activity"],
		default_clause: "users.id ASC",
		table: "users",
	};

	#[test]
	fn missing_input_uses_default_verbatim() {
		assert_eq!(order_by(&CONFIG, None), "ORDER BY users.id ASC");
	}

	#[test]
	fn allowed_column_is_qualified() {
		assert_eq!(
			order_by(&CONFIG, Some("latest_activity,desc")),
			"ORDER BY users.latest_activity DESC"
		);
	}

	#[test]
	fn column_without_direction_defaults_to_descending() {
		assert_eq!(order_by(&CONFIG, Some("username")), "ORDER BY users.username DESC");
	}

	#[test]
	fn ascending_direction_is_honored() {
		assert_eq!(order_by(&CONFIG, Some("id,asc")), "ORDER BY users.id ASC");
	}

	#[test]
	fn unknown_column_falls_back_to_default() {
		assert_eq!(order_by(&CONFIG, Some("password,asc")), "ORDER BY users.id ASC");
		assert_eq!(
			order_by(&CONFIG, Some("id; DROP TABLE users")),
			"ORDER BY users.id ASC"
		);
	}

	#[test]
	fn column_match_is_case_sensitive() {
		assert_eq!(order_by(&CONFIG, Some("ID,asc")), "ORDER BY users.id ASC");
	}

	#[test]
	fn junk_direction_degrades_to_descending() {
		assert_eq!(
			order_by(&CONFIG, Some("id,sideways")),
			"ORDER BY users.id DESC"
		);
	}
}
