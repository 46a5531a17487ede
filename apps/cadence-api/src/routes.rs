use axum::{
	Json, Router,
	extract::{RawQuery, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cadence_service::{
	BeatmapScoresRequest, FirstPlacesRequest, ServiceError, UserListRequest, UserScoresRequest,
	UserShowRequest, Viewer,
};

use crate::{params::QueryParams, state::AppState};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/users", get(users))
		.route("/v1/users/whatid", get(user_id))
		.route("/v1/users/lookup", get(lookup))
		.route("/v1/users/userpage", get(userpage))
		.route("/v1/users/self/userpage", post(set_userpage))
		.route("/v1/users/scores/best", get(user_best_scores))
		.route("/v1/users/scores/recent", get(user_recent_scores))
		.route("/v1/users/scores/first", get(user_first_places))
		.route("/v1/scores", get(beatmap_scores))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// GET /v1/users serves both shapes, as the historical API did: a single
/// profile when `id` or `name` is present, the filtered listing otherwise.
async fn users(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);

	if params.get("id").is_some() || params.get("name").is_some() {
		let req = UserShowRequest { id: params.get_string("id"), name: params.get_string("name") };
		let user = state.service.user(&viewer, &req).await?;

		return Ok(Json(user).into_response());
	}

	let req = UserListRequest {
		name: params.get_string("nname"),
		id: params.get_i64("iid"),
		privileges: params.get_u64("privileges"),
		has_privileges: params.get_u64("has_privileges"),
		has_not_privileges: params.get_u64("has_not_privileges"),
		country: params.get_string("country"),
		name_aka: params.get_string("name_aka"),
		privilege_group: params.get_string("privilege_group"),
		ids: params.get_all("ids"),
		names: params.get_all("names"),
		names_aka: params.get_all("names_aka"),
		countries: params.get_all("countries"),
		sort: params.get_string("sort"),
		page: params.get_string("p"),
		length: params.get_string("l"),
	};
	let response = state.service.users(&viewer, req).await?;

	Ok(Json(response).into_response())
}

async fn user_id(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let response =
		state.service.user_id(&viewer, params.get("name").unwrap_or_default()).await?;

	Ok(Json(response).into_response())
}

async fn lookup(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let response =
		state.service.lookup(&viewer, params.get("name").unwrap_or_default()).await?;

	Ok(Json(response).into_response())
}

async fn userpage(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let req = UserShowRequest { id: params.get_string("id"), name: params.get_string("name") };
	let response = state.service.userpage(&viewer, &req).await?;

	Ok(Json(response).into_response())
}

#[derive(Debug, Deserialize)]
struct SetUserpageBody {
	data: Option<String>,
}

async fn set_userpage(
	State(state): State<AppState>,
	Json(body): Json<SetUserpageBody>,
) -> Result<Response, ApiError> {
	let Some(data) = body.data else {
		return Err(json_error(StatusCode::BAD_REQUEST, "invalid_request", "Missing field data."));
	};
	let response = state.service.set_userpage(&Viewer::public(), &data).await?;

	Ok(Json(response).into_response())
}

async fn user_best_scores(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let req = user_scores_request(&params);
	let response = state.service.user_best_scores(&viewer, &req).await?;

	Ok(Json(response).into_response())
}

async fn user_recent_scores(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let req = user_scores_request(&params);
	let response = state.service.user_recent_scores(&viewer, &req).await?;

	Ok(Json(response).into_response())
}

async fn user_first_places(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let req = FirstPlacesRequest {
		user_id: params.get_i64("id"),
		mode: params.get_u8("mode"),
		source: params.get_i64("smode"),
		rx: params.get_i64("rx"),
		page: params.get_string("p"),
		length: params.get_string("l"),
	};
	let response = state.service.user_first_places(&viewer, &req).await?;

	Ok(Json(response).into_response())
}

async fn beatmap_scores(
	State(state): State<AppState>,
	RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
	let params = QueryParams::parse(raw.as_deref());
	let viewer = viewer(&params);
	let req = BeatmapScoresRequest {
		beatmap_id: params.get_i64("b"),
		user_id: params.get_i64("u"),
		name: params.get_string("name"),
		mods: params.get_u64("mods"),
		mode: params.get_u8("m"),
		source: params.get_i64("smode"),
		rx: params.get_i64("rx"),
		limit: params.get_string("limit"),
	};
	let response = state.service.beatmap_scores(&viewer, &req).await?;

	Ok(Json(response).into_response())
}

fn user_scores_request(params: &QueryParams) -> UserScoresRequest {
	UserScoresRequest {
		id: params.get_string("id"),
		name: params.get_string("name"),
		mode: params.get_u8("mode"),
		source: params.get_i64("smode"),
		rx: params.get_i64("rx"),
		page: params.get_string("p"),
		length: params.get_string("l"),
	}
}

// Authentication is not wired here; a deployment fronts this app with an
// auth layer that resolves tokens and injects the real viewer.
fn viewer(_params: &QueryParams) -> Viewer {
	Viewer::public()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal",
					"An error occurred. Try again later.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
