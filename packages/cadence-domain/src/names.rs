/// The "safe" form of a username: trimmed, case-folded, inner spaces
/// replaced with underscores. `users.username_safe` stores this form and
/// every name comparison goes through it.
pub fn safe_username(name: &str) -> String {
	name.trim().to_lowercase().replace(' ', "_")
}

/// Escapes LIKE wildcards so a lookup pattern matches them literally.
/// Backslashes first, or the escapes themselves would be escaped.
pub fn escape_like(value: &str) -> String {
	value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Strips control characters (keeping line structure) from user-authored
/// userpage content before it is stored.
pub fn sanitize_userpage(content: &str) -> String {
	content
		.chars()
		.filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
		.collect::<String>()
		.trim()
		.to_string()
}
