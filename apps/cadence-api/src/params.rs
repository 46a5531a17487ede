use url::form_urlencoded;

/// A decoded query string that preserves repeated keys. Repeated keys
/// (`ids=1&ids=2`) feed the membership filters; single accessors return the
/// first occurrence.
#[derive(Debug, Default)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	pub fn parse(raw: Option<&str>) -> Self {
		let Some(raw) = raw else { return Self::default() };

		Self { pairs: form_urlencoded::parse(raw.as_bytes()).into_owned().collect() }
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	pub fn get_string(&self, key: &str) -> Option<String> {
		self.get(key).map(ToString::to_string)
	}

	pub fn get_all(&self, key: &str) -> Vec<String> {
		self.pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.clone()).collect()
	}

	/// Numeric accessors treat unparsable input as absent.
	pub fn get_i64(&self, key: &str) -> Option<i64> {
		self.get(key)?.trim().parse().ok()
	}

	pub fn get_u64(&self, key: &str) -> Option<u64> {
		self.get(key)?.trim().parse().ok()
	}

	pub fn get_u8(&self, key: &str) -> Option<u8> {
		self.get(key)?.trim().parse().ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn repeated_keys_are_preserved() {
		let params = QueryParams::parse(Some("ids=1&ids=2&ids=3&country=US"));

		assert_eq!(params.get_all("ids"), vec!["1", "2", "3"]);
		assert_eq!(params.get("country"), Some("US"));
		assert!(params.get_all("names").is_empty());
	}

	#[test]
	fn values_are_percent_decoded() {
		let params = QueryParams::parse(Some("name=cool%20guy"));

		assert_eq!(params.get("name"), Some("cool guy"));
	}

	#[test]
	fn numeric_accessors_treat_junk_as_absent() {
		let params = QueryParams::parse(Some("id=12x&mode=2"));

		assert_eq!(params.get_i64("id"), None);
		assert_eq!(params.get_u8("mode"), Some(2));
		assert_eq!(params.get_u64("missing"), None);
	}

	#[test]
	fn missing_query_string_is_empty() {
		let params = QueryParams::parse(None);

		assert!(params.get("anything").is_none());
	}
}
