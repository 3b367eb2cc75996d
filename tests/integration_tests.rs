//! Integration tests for the exercise catalog API
//!
//! Each test writes a small catalog to a temporary directory, serves it on an
//! ephemeral port and talks to it over HTTP.

use exercisedb_api::context::AppContext;
use exercisedb_api::server;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

// ==================== Test Helpers ====================

fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).expect("Failed to write fixture");
}

/// Three exercises, the three taxonomies and a partial zh-CN translation.
fn write_catalog(dir: &Path) {
    write_json(
        &dir.join("exercises.json"),
        &json!([
            {
                "exerciseId": "ex-curl",
                "name": "Curl",
                "gifUrl": "https://static.example.com/curl.gif",
                "targetMuscles": ["biceps"],
                "secondaryMuscles": ["forearms"],
                "bodyParts": ["upper arms"],
                "equipments": ["dumbbell"],
                "instructions": ["Hold the dumbbells.", "Curl up."]
            },
            {
                "exerciseId": "ex-ab-roll",
                "name": "Ab Roll",
                "targetMuscles": ["abs"],
                "secondaryMuscles": ["lats"],
                "bodyParts": ["waist"],
                "equipments": ["wheel roller"],
                "instructions": ["Kneel.", "Roll out."]
            },
            {
                "exerciseId": "ex-squat",
                "name": "Squat",
                "targetMuscles": ["glutes"],
                "secondaryMuscles": ["abs"],
                "bodyParts": ["upper legs"],
                "equipments": ["barbell"],
                "instructions": ["Stand.", "Sit back."]
            }
        ]),
    );
    write_json(
        &dir.join("bodyparts.json"),
        &json!([{"name": "upper arms"}, {"name": "waist"}, {"name": "upper legs"}]),
    );
    write_json(
        &dir.join("equipments.json"),
        &json!([{"name": "dumbbell"}, {"name": "wheel roller"}, {"name": "barbell"}]),
    );
    write_json(
        &dir.join("muscles.json"),
        &json!([{"name": "biceps"}, {"name": "abs"}, {"name": "glutes"}]),
    );

    let zh = dir.join("translations").join("zh-CN");
    write_json(
        &zh.join("exercises.json"),
        &json!({"ex-curl": {"name": "弯举", "instructions": ["握住哑铃。", "向上弯举。"]}}),
    );
    write_json(&zh.join("bodyparts.json"), &json!({"upper arms": "上臂", "waist": "腰部"}));
    write_json(&zh.join("equipments.json"), &json!({"dumbbell": "哑铃"}));
    write_json(&zh.join("muscles.json"), &json!({"biceps": "肱二头肌", "abs": "腹肌"}));
    write_json(
        &zh.join("messages.json"),
        &json!({"exercise_not_found": "未找到动作 {exerciseId}。"}),
    );
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn get(&self, path_and_query: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path_and_query))
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.expect("body is not JSON");
        (status, body)
    }
}

async fn spawn_with(dir: TempDir, public_base_url: Option<String>) -> TestServer {
    let context = Arc::new(AppContext::from_dir(dir.path()));
    let app = server::router(context, public_base_url);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

async fn spawn() -> TestServer {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_catalog(dir.path());
    spawn_with(dir, None).await
}

fn names(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("data is not an array")
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect()
}

// ==================== Exercises ====================

#[tokio::test]
async fn test_sorted_first_page_with_metadata() {
    let server = spawn().await;
    let (status, body) = server
        .get("/api/v1/exercises?limit=2&offset=0&sortBy=name&sortOrder=asc")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(names(&body), vec!["Ab Roll", "Curl"]);

    let metadata = &body["metadata"];
    assert_eq!(metadata["totalPages"], 2);
    assert_eq!(metadata["totalExercises"], 3);
    assert_eq!(metadata["currentPage"], 1);
    assert!(metadata["previousPage"].is_null());

    let next = metadata["nextPage"].as_str().expect("nextPage missing");
    assert!(next.starts_with(&format!("{}/api/v1/exercises?", server.base_url)));
    assert!(next.contains("offset=2&limit=2"));
    assert!(next.contains("sortBy=name"));
    assert!(next.contains("sortOrder=asc"));
}

#[tokio::test]
async fn test_following_next_page_link() {
    let server = spawn().await;
    let (_, first) = server
        .get("/api/v1/exercises?limit=2&offset=0&sortBy=name&sortOrder=asc")
        .await;
    let next = first["metadata"]["nextPage"].as_str().unwrap();
    let path = next.trim_start_matches(&server.base_url);

    let (status, second) = server.get(path).await;
    assert_eq!(status, 200);
    assert_eq!(names(&second), vec!["Squat"]);
    assert_eq!(second["metadata"]["currentPage"], 2);
    assert!(second["metadata"]["nextPage"].is_null());
    assert!(second["metadata"]["previousPage"]
        .as_str()
        .unwrap()
        .contains("offset=0&limit=2"));
}

#[tokio::test]
async fn test_default_listing_sorts_by_target_muscle_descending() {
    let server = spawn().await;
    let (_, body) = server.get("/api/v1/exercises?sortBy=bogus&limit=-4").await;
    // glutes, biceps, abs
    assert_eq!(names(&body), vec!["Squat", "Curl", "Ab Roll"]);
    assert_eq!(body["metadata"]["totalPages"], 1);
}

#[tokio::test]
async fn test_exercise_by_id_passes_extra_fields_through() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises/ex-curl").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Curl");
    assert_eq!(body["data"]["gifUrl"], "https://static.example.com/curl.gif");
}

#[tokio::test]
async fn test_unknown_exercise_is_not_found() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises/does-not-exist").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "exercise does-not-exist not found.");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_not_found_message_is_localized() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises/nope?lang=zh-CN").await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "未找到动作 nope。");
}

#[tokio::test]
async fn test_exercise_is_translated() {
    let server = spawn().await;
    let (_, body) = server.get("/api/v1/exercises/ex-curl?lang=zh").await;
    let exercise = &body["data"];
    assert_eq!(exercise["exerciseId"], "ex-curl");
    assert_eq!(exercise["name"], "弯举");
    assert_eq!(exercise["instructions"], json!(["握住哑铃。", "向上弯举。"]));
    assert_eq!(exercise["targetMuscles"], json!(["肱二头肌"]));
    assert_eq!(exercise["secondaryMuscles"], json!(["forearms"]));
    assert_eq!(exercise["equipments"], json!(["哑铃"]));
}

// ==================== Search & filter ====================

#[tokio::test]
async fn test_search_requires_query() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises/search?q=%20").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Query parameter 'q' is required.");
}

#[tokio::test]
async fn test_search_tolerates_typos() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises/search?q=sqat").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["Squat"]);
}

#[tokio::test]
async fn test_filter_or_within_and_across_dimensions() {
    let server = spawn().await;
    let (_, body) = server
        .get("/api/v1/exercises/filter?muscles=abs,biceps&sortBy=name&sortOrder=asc")
        .await;
    assert_eq!(names(&body), vec!["Ab Roll", "Curl"]);

    let (_, body) = server
        .get("/api/v1/exercises/filter?muscles=abs,biceps&bodyParts=waist")
        .await;
    assert_eq!(names(&body), vec!["Ab Roll"]);
}

#[tokio::test]
async fn test_filter_accepts_localized_names() {
    let server = spawn().await;
    let (_, localized) = server
        .get("/api/v1/exercises/filter?equipment=%E5%93%91%E9%93%83&lang=zh-CN")
        .await;
    let (_, canonical) = server
        .get("/api/v1/exercises/filter?equipment=dumbbell&lang=zh-CN")
        .await;
    assert_eq!(names(&localized), vec!["弯举"]);
    assert_eq!(localized["data"], canonical["data"]);
}

// ==================== Taxonomies ====================

#[tokio::test]
async fn test_body_parts_translated_with_fallback() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/bodyparts?lang=zh-CN").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["上臂", "腰部", "upper legs"]);
    assert!(body.get("metadata").is_none());
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_english() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/muscles?lang=xx-YY").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["biceps", "abs", "glutes"]);
}

#[tokio::test]
async fn test_exercises_by_localized_body_part() {
    let server = spawn().await;
    let (status, body) = server
        .get("/api/v1/bodyparts/%E8%85%B0%E9%83%A8/exercises?lang=zh-CN")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["exerciseId"], "ex-ab-roll");
    assert_eq!(body["metadata"]["totalExercises"], 1);
}

#[tokio::test]
async fn test_exercises_by_equipment_case_insensitive() {
    let server = spawn().await;
    let (_, body) = server.get("/api/v1/equipments/BARBELL/exercises").await;
    assert_eq!(names(&body), vec!["Squat"]);
}

#[tokio::test]
async fn test_exercises_by_muscle_secondary_switch() {
    let server = spawn().await;
    let (_, body) = server.get("/api/v1/muscles/abs/exercises").await;
    assert_eq!(names(&body), vec!["Ab Roll"]);

    let (_, body) = server
        .get("/api/v1/muscles/abs/exercises?includeSecondary=true")
        .await;
    assert_eq!(names(&body), vec!["Ab Roll", "Squat"]);

    let (_, body) = server
        .get("/api/v1/muscles/abs/exercises?includeSecondary=1")
        .await;
    assert_eq!(names(&body), vec!["Ab Roll", "Squat"]);

    let (_, body) = server
        .get("/api/v1/muscles/abs/exercises?includeSecondary=no")
        .await;
    assert_eq!(names(&body), vec!["Ab Roll"]);
}

// ==================== Failure modes ====================

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/exercises?limit=2&limit=3").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["totalPages"], 2);

    let (status, body) = server.get("/api/v1/bodyparts?lang=zh&lang=en").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["上臂", "腰部", "upper legs"]);
}

#[tokio::test]
async fn test_malformed_query_string_uses_defaults() {
    let server = spawn().await;
    let (status, body) = server
        .get("/api/v1/exercises?limit=%ZZ&&=&sortOrder&offset=1%")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["totalExercises"], 3);
    assert_eq!(body["metadata"]["currentPage"], 1);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = spawn().await;
    let (status, body) = server.get("/api/v1/nothing-here").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route /api/v1/nothing-here not found.");
}

#[tokio::test]
async fn test_missing_catalog_is_server_error() {
    let dir = TempDir::new().unwrap();
    let server = spawn_with(dir, None).await;
    let (status, body) = server.get("/api/v1/exercises").await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "database not working");
}

#[tokio::test]
async fn test_missing_translations_serve_canonical_text() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path());
    std::fs::remove_file(dir.path().join("translations/zh-CN/muscles.json")).unwrap();
    let server = spawn_with(dir, None).await;

    let (status, body) = server.get("/api/v1/bodyparts?lang=zh-CN").await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["upper arms", "waist", "upper legs"]);
}

#[tokio::test]
async fn test_public_base_url_used_for_links() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path());
    let server = spawn_with(dir, Some("https://api.example.com".to_string())).await;

    let (_, body) = server.get("/api/v1/exercises?limit=1&lang=zh").await;
    assert_eq!(
        body["metadata"]["nextPage"],
        "https://api.example.com/api/v1/exercises?offset=1&limit=1&lang=zh"
    );
}
