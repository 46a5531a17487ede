/// Per-endpoint pagination bounds.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
	pub default_size: u32,
	pub max_size: u32,
}

/// A clamped, always-bounded page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub size: u32,
	pub offset: u64,
}

impl Page {
	pub fn clause(&self) -> String {
		format!("LIMIT {} OFFSET {}", self.size, self.offset)
	}
}

/// Parses raw `page`/`length` parameters. Missing or non-numeric input
/// defaults to page 1 and the configured default size; the size is clamped
/// into `[1, max_size]` and the page to at least 1, so the resulting window
/// is never unbounded and never negative.
pub fn paginate(cfg: &PageConfig, page: Option<&str>, size: Option<&str>) -> Page {
	let page = parse_or(page, 1).max(1);
	let size = parse_or(size, u64::from(cfg.default_size)).clamp(1, u64::from(cfg.max_size));

	Page { size: size as u32, offset: (page - 1).saturating_mul(size) }
}

fn parse_or(raw: Option<&str>, default: u64) -> u64 {
	raw.and_then(|value| value.trim().parse::<u64>().ok()).unwrap_or(default)
}
