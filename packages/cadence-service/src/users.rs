use cadence_domain::{
	Filter, Param, SortConfig,
	names::{escape_like, safe_username, sanitize_userpage},
	order_by, paginate,
};
use cadence_storage::models::UserRow;
use sqlx::FromRow;

use crate::{
	CadenceService, ServiceError, ServiceResult, Viewer, bind_params, normalize, normalize::User,
};

const USER_FIELDS: &str = "\
SELECT users.id, users.username, users.register_datetime, users.privileges, \
users.latest_activity, us.username_aka, us.country \
FROM users INNER JOIN users_stats AS us ON users.id = us.id";

const USER_SORT: SortConfig = SortConfig {
	allowed: &["id", "username", "privileges", "donor_expire", "latest_activity", "silence_end"],
	default_clause: "users.id ASC",
	table: "users",
};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UserShowRequest {
	pub id: Option<String>,
	pub name: Option<String>,
}

/// Listing filters. Every field is optional; an absent field restricts
/// nothing. The plural fields come from repeated query parameters and feed
/// membership clauses.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct UserListRequest {
	pub name: Option<String>,
	pub id: Option<i64>,
	pub privileges: Option<u64>,
	pub has_privileges: Option<u64>,
	pub has_not_privileges: Option<u64>,
	pub country: Option<String>,
	pub name_aka: Option<String>,
	pub privilege_group: Option<String>,
	pub ids: Vec<String>,
	pub names: Vec<String>,
	pub names_aka: Vec<String>,
	pub countries: Vec<String>,
	pub sort: Option<String>,
	pub page: Option<String>,
	pub length: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserListResponse {
	pub users: Vec<User>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserIdResponse {
	pub id: i32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LookupUser {
	pub id: i32,
	pub username: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserLookupResponse {
	pub users: Vec<LookupUser>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserpageResponse {
	pub userpage: String,
}

impl CadenceService {
	/// Fetches one profile by id, name, or `self`.
	pub async fn user(&self, viewer: &Viewer, req: &UserShowRequest) -> ServiceResult<User> {
		let (clause, param) =
			user_clause(viewer, "users", req.id.as_deref(), req.name.as_deref())?;
		let sql = format!(
			"{USER_FIELDS} WHERE {clause} AND {} LIMIT 1",
			self.providers.visibility.user_clause(viewer),
		);
		let row =
			bind_params(sqlx::query(&sql), vec![param]).fetch_optional(&self.db.pool).await?;
		let Some(row) = row else {
			return Err(ServiceError::NotFound { message: "No such user was found.".to_string() });
		};

		Ok(normalize::user(UserRow::from_row(&row)?))
	}

	/// Filtered profile listing.
	pub async fn users(
		&self,
		viewer: &Viewer,
		req: UserListRequest,
	) -> ServiceResult<UserListResponse> {
		let group_join =
			if req.privilege_group.as_deref().map(str::trim).unwrap_or("").is_empty() {
				""
			} else {
				" LEFT JOIN privileges_groups AS pg ON users.privileges & pg.privileges = pg.privileges"
			};
		let (where_sql, params) = Filter::new()
			.eq("users.username_safe = ?", req.name.as_deref().map(safe_username))
			.eq("users.id = ?", req.id)
			.eq("users.privileges = ?", req.privileges)
			.mask("users.privileges & ? > 0", req.has_privileges)
			.mask("users.privileges & ? = 0", req.has_not_privileges)
			.eq("us.country = ?", req.country)
			.eq("us.username_aka = ?", req.name_aka)
			.eq("pg.name = ?", req.privilege_group)
			.among("users.id", req.ids)
			.among("users.username_safe", req.names.iter().map(|name| safe_username(name)))
			.among("us.username_aka", req.names_aka)
			.among("us.country", req.countries)
			.render();
		let order = order_by(&USER_SORT, req.sort.as_deref());
		let window =
			paginate(&self.list_page_config(), req.page.as_deref(), req.length.as_deref());
		let sql = format!(
			"{USER_FIELDS}{group_join} WHERE {where_sql} AND {} {order} {}",
			self.providers.visibility.user_clause(viewer),
			window.clause(),
		);
		let rows = bind_params(sqlx::query(&sql), params).fetch_all(&self.db.pool).await?;
		let mut users = Vec::with_capacity(rows.len());

		for row in &rows {
			// one bad row never takes down the whole listing
			match UserRow::from_row(row) {
				Ok(raw) => users.push(normalize::user(raw)),
				Err(err) => tracing::warn!(%err, "Skipping undecodable user row."),
			}
		}

		Ok(UserListResponse { users })
	}

	/// Name → id shortcut. Users the viewer may not see surface as
	/// not-found, indistinguishable from missing ones.
	pub async fn user_id(&self, viewer: &Viewer, name: &str) -> ServiceResult<UserIdResponse> {
		let safe = safe_username(name);

		if safe.is_empty() {
			return Err(ServiceError::InvalidRequest { message: "Pass a username.".to_string() });
		}

		let row: Option<(i32, u64)> =
			sqlx::query_as("SELECT id, privileges FROM users WHERE username_safe = ? LIMIT 1")
				.bind(safe)
				.fetch_optional(&self.db.pool)
				.await?;

		match row {
			Some((id, user_privileges))
				if self.providers.visibility.user_visible(viewer, user_privileges) =>
				Ok(UserIdResponse { id }),
			_ => Err(ServiceError::NotFound {
				message: "That user could not be found.".to_string(),
			}),
		}
	}

	/// Substring username search, bounded by the configured lookup limit.
	pub async fn lookup(&self, viewer: &Viewer, name: &str) -> ServiceResult<UserLookupResponse> {
		let safe = safe_username(name);

		if safe.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Provide a username to start searching.".to_string(),
			});
		}

		let pattern = format!("%{}%", escape_like(&safe));
		// managers may additionally look users up by exact e-mail
		let email = if self.providers.visibility.can_manage_users(viewer) && name.contains('@') {
			name.to_string()
		} else {
			String::new()
		};
		let sql = format!(
			"SELECT users.id, users.username FROM users \
			WHERE (username_safe LIKE ? OR email = ?) AND {} LIMIT {}",
			self.providers.visibility.user_clause(viewer),
			self.cfg.api.lookup_limit,
		);
		let rows: Vec<(i32, String)> =
			sqlx::query_as(&sql).bind(pattern).bind(email).fetch_all(&self.db.pool).await?;
		let users =
			rows.into_iter().map(|(id, username)| LookupUser { id, username }).collect();

		Ok(UserLookupResponse { users })
	}

	/// Fetches a userpage; missing content normalizes to an empty string.
	pub async fn userpage(
		&self,
		viewer: &Viewer,
		req: &UserShowRequest,
	) -> ServiceResult<UserpageResponse> {
		let (clause, param) = user_clause(viewer, "us", req.id.as_deref(), req.name.as_deref())?;
		let sql =
			format!("SELECT us.userpage_content FROM users_stats AS us WHERE {clause} LIMIT 1");
		let query = sqlx::query_scalar::<_, Option<String>>(&sql);
		let query = match param {
			Param::Int(value) => query.bind(value),
			Param::UInt(value) => query.bind(value),
			Param::Text(value) => query.bind(value),
		};
		let Some(content) = query.fetch_optional(&self.db.pool).await? else {
			return Err(ServiceError::NotFound { message: "No such user.".to_string() });
		};

		Ok(UserpageResponse { userpage: content.unwrap_or_default() })
	}

	/// Replaces the viewer's own userpage and returns the stored content.
	pub async fn set_userpage(&self, viewer: &Viewer, data: &str) -> ServiceResult<UserpageResponse> {
		let content = sanitize_userpage(data);

		sqlx::query("UPDATE users_stats SET userpage_content = ? WHERE id = ? LIMIT 1")
			.bind(&content)
			.bind(viewer.user_id)
			.execute(&self.db.pool)
			.await?;

		self.userpage(viewer, &UserShowRequest { id: Some("self".to_string()), name: None }).await
	}
}

/// The single-user WHERE head shared by profile, userpage and score
/// lookups: `self`, a numeric id, or a name. A malformed id aborts the
/// request before any store call is made.
pub(crate) fn user_clause(
	viewer: &Viewer,
	table: &str,
	id: Option<&str>,
	name: Option<&str>,
) -> ServiceResult<(String, Param)> {
	if let Some(id) = id.filter(|value| !value.is_empty()) {
		if id == "self" {
			return Ok((format!("{table}.id = ?"), Param::Int(viewer.user_id)));
		}

		let id = id.parse::<i64>().map_err(|_| ServiceError::InvalidRequest {
			message: "Pass a valid user id.".to_string(),
		})?;

		return Ok((format!("{table}.id = ?"), Param::Int(id)));
	}
	if let Some(name) = name.filter(|value| !value.is_empty()) {
		return Ok((format!("{table}.username_safe = ?"), Param::Text(safe_username(name))));
	}

	Err(ServiceError::InvalidRequest {
		message: "Pass either the id or name query parameter.".to_string(),
	})
}
