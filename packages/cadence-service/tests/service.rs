use cadence_config::{Api, Config, MySql, Service, Storage};
use cadence_service::{
	BeatmapScoresRequest, CadenceService, FirstPlacesRequest, ServiceError, UserListRequest,
	UserScoresRequest, UserShowRequest, Viewer,
};
use cadence_storage::db::Db;
use cadence_testkit::TestDatabase;
use sqlx::MySqlPool;

const IGNORE: &str = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run.";

fn test_config(dsn: String, api: Api) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { mysql: MySql { dsn, pool_max_conns: 2 } },
		api,
	}
}

async fn service_on(test_db: &TestDatabase, api: Api) -> CadenceService {
	let cfg = test_config(test_db.dsn().to_string(), api);
	let db = Db::connect(&cfg.storage.mysql).await.expect("Failed to connect to MySQL.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	CadenceService::new(cfg, db)
}

async fn seed_user(pool: &MySqlPool, id: i32, username: &str, country: &str, privileges: u64) {
	sqlx::query(
		"INSERT INTO users (id, username, username_safe, register_datetime, privileges, latest_activity) \
		VALUES (?, ?, ?, 1600000000, ?, 1700000000)",
	)
	.bind(id)
	.bind(username)
	.bind(username.to_lowercase().replace(' ', "_"))
	.bind(privileges)
	.execute(pool)
	.await
	.expect("Failed to seed user.");

	sqlx::query("INSERT INTO users_stats (id, username_aka, country) VALUES (?, NULL, ?)")
		.bind(id)
		.bind(country)
		.execute(pool)
		.await
		.expect("Failed to seed user stats.");
}

async fn seed_beatmap(pool: &MySqlPool, md5: &str, beatmap_id: i32, song_name: &str) {
	sqlx::query(
		"INSERT INTO beatmaps (beatmap_id, beatmapset_id, beatmap_md5, song_name, ar, od, difficulty_std) \
		VALUES (?, 1, ?, ?, 9, 8, 5.5)",
	)
	.bind(beatmap_id)
	.bind(md5)
	.bind(song_name)
	.execute(pool)
	.await
	.expect("Failed to seed beatmap.");
}

#[allow(clippy::too_many_arguments)]
async fn seed_score(
	pool: &MySqlPool,
	table: &str,
	id: u64,
	user_id: i32,
	md5: &str,
	pp: f64,
	accuracy: Option<f64>,
	completed: u8,
) {
	let sql = format!(
		"INSERT INTO {table} \
		(id, beatmap_md5, userid, score, max_combo, full_combo, mods, count_300, count_100, \
		count_50, count_geki, count_katu, count_miss, time, play_mode, accuracy, pp, completed) \
		VALUES (?, ?, ?, 727000, 500, 1, 0, 500, 0, 0, 100, 0, 0, 1700000000, 0, ?, ?, ?)",
	);

	sqlx::query(&sql)
		.bind(id)
		.bind(md5)
		.bind(user_id)
		.bind(accuracy)
		.bind(pp)
		.bind(completed)
		.execute(pool)
		.await
		.expect("Failed to seed score.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn filtered_listing_matches_country_and_privilege_group() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping filtered_listing_matches_country_and_privilege_group; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;

	seed_user(pool, 1, "alice", "US", 1 | 4).await;
	seed_user(pool, 2, "bob", "US", 1).await;
	seed_user(pool, 3, "carol", "DE", 1 | 4).await;
	seed_user(pool, 4, "dave", "US", 1 | 4).await;
	sqlx::query("INSERT INTO privileges_groups (name, privileges) VALUES ('donor', 4)")
		.execute(pool)
		.await
		.expect("Failed to seed privilege group.");

	let req = UserListRequest {
		country: Some("US".to_string()),
		privilege_group: Some("donor".to_string()),
		..UserListRequest::default()
	};
	let response =
		service.users(&Viewer::public(), req).await.expect("Failed to list users.");

	// both conditions applied, default ascending-id order
	let ids = response.users.iter().map(|user| user.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![1, 4]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn membership_filters_restrict_to_the_given_set() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping membership_filters_restrict_to_the_given_set; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;

	seed_user(pool, 1, "Cool Guy", "US", 1).await;
	seed_user(pool, 2, "bob", "US", 1).await;
	seed_user(pool, 3, "carol", "DE", 1).await;

	// raw names are safe-folded per value before the IN clause is built
	let req = UserListRequest {
		names: vec!["Cool Guy".to_string(), "CAROL".to_string()],
		..UserListRequest::default()
	};
	let response =
		service.users(&Viewer::public(), req).await.expect("Failed to list users.");
	let ids = response.users.iter().map(|user| user.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![1, 3]);

	// an empty membership set restricts nothing
	let response = service
		.users(&Viewer::public(), UserListRequest::default())
		.await
		.expect("Failed to list users.");

	assert_eq!(response.users.len(), 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn unknown_user_id_is_not_found_not_a_storage_error() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping unknown_user_id_is_not_found_not_a_storage_error; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let req = UserShowRequest { id: Some("999999".to_string()), name: None };
	let err = service.user(&Viewer::public(), &req).await.unwrap_err();

	assert!(matches!(err, ServiceError::NotFound { .. }), "got {err:?}");

	let err = service
		.user(&Viewer::public(), &UserShowRequest { id: Some("4x2".to_string()), name: None })
		.await
		.unwrap_err();

	assert!(matches!(err, ServiceError::InvalidRequest { .. }), "got {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn page_size_above_the_ceiling_clamps_to_the_ceiling() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping page_size_above_the_ceiling_clamps_to_the_ceiling; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let api = Api { default_page_size: 2, max_page_size: 3, ..Api::default() };
	let service = service_on(&test_db, api).await;
	let pool = &service.db.pool;

	for id in 1..=5 {
		seed_user(pool, id, &format!("user{id}"), "US", 1).await;
	}

	let req = UserListRequest { length: Some("500".to_string()), ..UserListRequest::default() };
	let response =
		service.users(&Viewer::public(), req).await.expect("Failed to list users.");

	assert_eq!(response.users.len(), 3);

	// and the default size applies when no length is requested
	let response = service
		.users(&Viewer::public(), UserListRequest::default())
		.await
		.expect("Failed to list users.");

	assert_eq!(response.users.len(), 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn null_accuracy_rows_are_skipped_not_fatal() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping null_accuracy_rows_are_skipped_not_fatal; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;
	let md5 = "d".repeat(32);

	seed_user(pool, 1, "alice", "US", 1).await;
	seed_score(pool, "scores", 10, 1, &md5, 100.0, Some(0.99), 3).await;
	seed_score(pool, "scores", 11, 1, &md5, 90.0, None, 3).await;
	seed_score(pool, "scores", 12, 1, &md5, 80.0, Some(0.91), 3).await;

	let req = UserScoresRequest { id: Some("1".to_string()), ..UserScoresRequest::default() };
	let response = service
		.user_recent_scores(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch recent scores.");
	let ids = response.scores.iter().map(|score| score.id).collect::<Vec<_>>();

	// the legacy row without accuracy is dropped, the rest of the page survives
	assert_eq!(ids, vec![12, 10]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn source_flag_selects_its_table_and_degrades_to_vanilla() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping source_flag_selects_its_table_and_degrades_to_vanilla; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;
	let md5 = "e".repeat(32);

	seed_user(pool, 1, "alice", "US", 1).await;
	seed_score(pool, "scores", 500, 1, &md5, 100.0, Some(0.99), 3).await;
	seed_score(pool, "scores_relax", 600, 1, &md5, 200.0, Some(0.98), 3).await;

	let base = UserScoresRequest { id: Some("1".to_string()), ..UserScoresRequest::default() };
	let vanilla = service
		.user_best_scores(&Viewer::public(), &base)
		.await
		.expect("Failed to fetch best scores.");

	assert_eq!(vanilla.scores[0].id, 500);

	let relax = UserScoresRequest { source: Some(1), ..base.clone() };
	let relax = service
		.user_best_scores(&Viewer::public(), &relax)
		.await
		.expect("Failed to fetch relax scores.");

	assert_eq!(relax.scores[0].id, 600);

	let junk = UserScoresRequest { source: Some(99), ..base.clone() };
	let junk = service
		.user_best_scores(&Viewer::public(), &junk)
		.await
		.expect("Failed to fetch scores with a junk source flag.");

	assert_eq!(junk.scores[0].id, 500);

	let rx = UserScoresRequest { rx: Some(1), ..base };
	let rx = service
		.user_best_scores(&Viewer::public(), &rx)
		.await
		.expect("Failed to fetch rx scores.");

	assert_eq!(rx.scores[0].id, 600);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn best_scores_require_a_completed_pass_and_order_by_pp() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping best_scores_require_a_completed_pass_and_order_by_pp; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;
	let md5 = "f".repeat(32);

	seed_user(pool, 1, "alice", "US", 1).await;
	seed_beatmap(pool, &md5, 42, "Artist - Title [Insane]").await;
	seed_score(pool, "scores", 20, 1, &md5, 100.0, Some(0.97), 3).await;
	seed_score(pool, "scores", 21, 1, &md5, 250.0, Some(0.99), 3).await;
	seed_score(pool, "scores", 22, 1, &md5, 999.0, Some(0.50), 2).await;

	let req = UserScoresRequest { id: Some("1".to_string()), ..UserScoresRequest::default() };
	let best = service
		.user_best_scores(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch best scores.");
	let ids = best.scores.iter().map(|score| score.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![21, 20]);
	assert_eq!(best.scores[0].beatmap.beatmap_id, 42);
	assert_eq!(best.scores[0].beatmap.song_name, "Artist - Title [Insane]");
	assert_eq!(best.scores[0].rank, "SS");

	let recent = service
		.user_recent_scores(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch recent scores.");

	assert_eq!(recent.scores.len(), 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn score_without_a_beatmap_row_normalizes_to_sentinels() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping score_without_a_beatmap_row_normalizes_to_sentinels; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;

	seed_user(pool, 1, "alice", "US", 1).await;
	// no beatmaps row for this hash: the LEFT JOIN comes back all-NULL
	seed_score(pool, "scores", 30, 1, &"a".repeat(32), 50.0, Some(0.96), 3).await;

	let req = UserScoresRequest { id: Some("1".to_string()), ..UserScoresRequest::default() };
	let response = service
		.user_best_scores(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch best scores.");
	let score = &response.scores[0];

	assert_eq!(score.beatmap.beatmap_id, 0);
	assert_eq!(score.beatmap.song_name, "");
	assert_eq!(score.beatmap.difficulty, 0.0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn first_places_come_from_the_selected_source() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping first_places_come_from_the_selected_source; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;
	let md5 = "b".repeat(32);

	seed_user(pool, 1, "alice", "US", 1).await;
	seed_score(pool, "scores", 40, 1, &md5, 120.0, Some(0.99), 3).await;
	sqlx::query(
		"INSERT INTO first_places (score_id, user_id, play_mode, source, beatmap_md5) \
		VALUES (40, 1, 0, 0, ?)",
	)
	.bind(&md5)
	.execute(pool)
	.await
	.expect("Failed to seed first place.");

	let req = FirstPlacesRequest { user_id: Some(1), ..FirstPlacesRequest::default() };
	let response = service
		.user_first_places(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch first places.");

	assert_eq!(response.scores.len(), 1);
	assert_eq!(response.scores[0].id, 40);

	let missing = FirstPlacesRequest { user_id: None, ..FirstPlacesRequest::default() };
	let err = service.user_first_places(&Viewer::public(), &missing).await.unwrap_err();

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn beatmap_scores_resolve_the_map_or_404() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping beatmap_scores_resolve_the_map_or_404; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;
	let md5 = "c".repeat(32);

	seed_user(pool, 1, "alice", "US", 1).await;
	seed_user(pool, 2, "bob", "US", 1).await;
	seed_beatmap(pool, &md5, 77, "Artist - Title [Extra]").await;
	seed_score(pool, "scores", 50, 1, &md5, 120.0, Some(0.99), 3).await;
	seed_score(pool, "scores", 51, 2, &md5, 80.0, Some(0.93), 3).await;

	let req = BeatmapScoresRequest { beatmap_id: Some(77), ..BeatmapScoresRequest::default() };
	let response = service
		.beatmap_scores(&Viewer::public(), &req)
		.await
		.expect("Failed to fetch beatmap scores.");
	let ids = response.scores.iter().map(|score| score.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![50, 51]);

	let filtered =
		BeatmapScoresRequest { beatmap_id: Some(77), user_id: Some(2), ..Default::default() };
	let response = service
		.beatmap_scores(&Viewer::public(), &filtered)
		.await
		.expect("Failed to fetch filtered beatmap scores.");

	assert_eq!(response.scores.len(), 1);
	assert_eq!(response.scores[0].id, 51);

	let unknown =
		BeatmapScoresRequest { beatmap_id: Some(123456), ..BeatmapScoresRequest::default() };
	let err = service.beatmap_scores(&Viewer::public(), &unknown).await.unwrap_err();

	assert!(matches!(err, ServiceError::NotFound { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn userpage_update_roundtrips_sanitized_content() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping userpage_update_roundtrips_sanitized_content; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;

	seed_user(pool, 7, "alice", "US", 1).await;

	let viewer = Viewer { user_id: 7, token_privileges: 0 };
	let updated = service
		.set_userpage(&viewer, "hello\u{0} world")
		.await
		.expect("Failed to set userpage.");

	assert_eq!(updated.userpage, "hello world");

	let fetched = service
		.userpage(&viewer, &UserShowRequest { id: None, name: Some("alice".to_string()) })
		.await
		.expect("Failed to fetch userpage.");

	assert_eq!(fetched.userpage, "hello world");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set CADENCE_MYSQL_DSN to run."]
async fn hidden_users_are_invisible_to_public_viewers() {
	let Some(dsn) = cadence_testkit::env_dsn() else {
		eprintln!("Skipping hidden_users_are_invisible_to_public_viewers; {IGNORE}");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let service = service_on(&test_db, Api::default()).await;
	let pool = &service.db.pool;

	// privileges 0: the public bit is unset
	seed_user(pool, 1, "ghost", "US", 0).await;

	let req = UserShowRequest { id: None, name: Some("ghost".to_string()) };
	let err = service.user(&Viewer::public(), &req).await.unwrap_err();

	assert!(matches!(err, ServiceError::NotFound { .. }));

	let err = service.user_id(&Viewer::public(), "ghost").await.unwrap_err();

	assert!(matches!(err, ServiceError::NotFound { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
