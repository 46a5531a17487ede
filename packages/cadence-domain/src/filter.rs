/// A positionally bound query value. Everything a caller supplies reaches
/// the store through one of these; nothing is ever spliced into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
	Int(i64),
	UInt(u64),
	Text(String),
}

impl From<i64> for Param {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<i32> for Param {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}
impl From<u64> for Param {
	fn from(value: u64) -> Self {
		Self::UInt(value)
	}
}
impl From<u32> for Param {
	fn from(value: u32) -> Self {
		Self::UInt(u64::from(value))
	}
}
impl From<u8> for Param {
	fn from(value: u8) -> Self {
		Self::UInt(u64::from(value))
	}
}
impl From<String> for Param {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for Param {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

/// Accumulates optional, conjoined WHERE conditions as ordered
/// (clause template, parameter) pairs. The number of `?` placeholders in
/// the rendered fragment always equals the number of parameters, in order.
#[derive(Debug, Default)]
pub struct Filter {
	clauses: Vec<String>,
	params: Vec<Param>,
}

impl Filter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `template` (one `?` placeholder) only when `value` is
	/// present. Text values additionally treat the empty string as "not
	/// supplied", matching how blank query parameters arrive.
	pub fn eq<P>(mut self, template: &str, value: Option<P>) -> Self
	where
		P: Into<Param>,
	{
		let Some(value) = value else { return self };
		let param = value.into();

		if let Param::Text(text) = &param
			&& text.is_empty()
		{
			return self;
		}

		self.clauses.push(template.to_string());
		self.params.push(param);

		self
	}

	/// Bitmask condition (`column & ? > 0` / `column & ? = 0`). `Some(0)`
	/// is treated the same as `None`: a zero mask cannot be told apart from
	/// "parameter not supplied", so callers can never filter for the
	/// exactly-zero mask. Kept as-is for compatibility with the historical
	/// API surface.
	pub fn mask(mut self, template: &str, value: Option<u64>) -> Self {
		match value {
			Some(mask) if mask != 0 => {
				self.clauses.push(template.to_string());
				self.params.push(Param::UInt(mask));

				self
			},
			_ => self,
		}
	}

	/// Exact-mask condition (`column & ? = ?`): the template carries two
	/// placeholders and the mask binds to both.
	pub fn mask_exact(mut self, template: &str, value: Option<u64>) -> Self {
		let Some(mask) = value else { return self };

		self.clauses.push(template.to_string());
		self.params.push(Param::UInt(mask));
		self.params.push(Param::UInt(mask));

		self
	}

	/// Membership condition rendered as `column IN (?, …)` with one bound
	/// parameter per value. An empty set adds no clause at all: absence
	/// means "unrestricted", never an always-false `IN ()`. Malformed
	/// values bind normally and simply match no rows.
	pub fn among<I, P>(mut self, column: &str, values: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<Param>,
	{
		let params = values.into_iter().map(Into::into).collect::<Vec<_>>();

		if params.is_empty() {
			return self;
		}

		let placeholders = vec!["?"; params.len()].join(", ");

		self.clauses.push(format!("{column} IN ({placeholders})"));
		self.params.extend(params);

		self
	}

	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}

	/// Renders the conjunction and its parameters. With no conditions the
	/// fragment is the literal true predicate `1`, so an all-optional
	/// filter set still composes into valid SQL.
	pub fn render(self) -> (String, Vec<Param>) {
		if self.clauses.is_empty() {
			("1".to_string(), Vec::new())
		} else {
			(self.clauses.join(" AND "), self.params)
		}
	}
}
