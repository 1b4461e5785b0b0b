use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recipe_finder::dataset::Dataset;
use recipe_finder::nutrition::NutritionFetcher;
use recipe_finder::server::{router, AppState};

// Recipe URLs point at a closed port so nutrition lookups fail fast and
// degrade to sentinels unless a test swaps in mockito-hosted pages.
const DATASET: &str = concat!(
    "name,url,ingredients\n",
    "\"Салат\",http://127.0.0.1:1/salad,\"{'Соль': '1 ч.л.', 'Перец': '1 щепотка'}\"\n",
    "\"Салат с маслом\",http://127.0.0.1:1/salad-oil,\"{'Соль': '1 ч.л.', 'Перец': '1 щепотка', 'Масло': '2 ст.л.'}\"\n",
);

fn app_with(raw_dataset: &str) -> Router {
    let dataset = Dataset::parse(raw_dataset).expect("test dataset should parse");
    let fetcher = NutritionFetcher::new(Duration::from_secs(2), "recipe-finder-tests");
    router(Arc::new(AppState { dataset, fetcher }))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Failed to execute request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let value = serde_json::from_slice(&bytes).expect("Response body should be JSON");

    (status, value)
}

#[tokio::test]
async fn test_index_serves_front_page() {
    let app = app_with(DATASET);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_check_ingredient_normalizes_and_finds() {
    let (status, body) = post_json(
        app_with(DATASET),
        "/check-ingredient",
        json!({ "ingredient": "  СОЛЬ " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "found");
    assert_eq!(body["ingredient"], "соль");
}

#[tokio::test]
async fn test_check_ingredient_not_found() {
    let (status, body) = post_json(
        app_with(DATASET),
        "/check-ingredient",
        json!({ "ingredient": "трюфель" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["ingredient"], "трюфель");
}

#[tokio::test]
async fn test_empty_ingredient_list_is_bad_request() {
    let (status, body) = post_json(
        app_with(DATASET),
        "/get-recipes",
        json!({ "ingredients": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ingredients"));
}

#[tokio::test]
async fn test_exact_match_ranks_first_and_fetch_failures_degrade() {
    let (status, body) = post_json(
        app_with(DATASET),
        "/get-recipes",
        json!({ "ingredients": ["Соль", "ПЕРЕЦ"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);

    // "Салат" equals the user's set; the superset recipe comes second.
    assert_eq!(results[0]["name"], "Салат");
    assert_eq!(results[0]["match_info"], "2 of 2 ingredients");
    assert_eq!(results[1]["name"], "Салат с маслом");
    assert_eq!(results[1]["match_info"], "2 of 3 ingredients");

    // The URLs are unreachable, so every nutrition field is the sentinel.
    for result in results {
        assert_eq!(result["calories"], "N/A");
        assert_eq!(result["proteins"], "N/A");
        assert_eq!(result["fats"], "N/A");
        assert_eq!(result["carbs"], "N/A");
        assert_eq!(result["calories100g"], "N/A");
    }
}

#[tokio::test]
async fn test_full_flow_zips_nutrition_with_ranked_recipes() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/borscht")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><body>
            <div itemprop="nutrition">
                <strong itemprop="calories">1500 ккал</strong>
                <strong itemprop="proteinContent">50 г</strong>
                <strong itemprop="fatContent">80 г</strong>
                <strong itemprop="carbohydrateContent">120 г</strong>
                <table>
                    <tr><td><strong>100 г блюда</strong></td></tr>
                    <tr><td><strong>90 ккал</strong></td></tr>
                </table>
            </div>
            </body></html>"#,
        )
        .create_async()
        .await;

    let raw_dataset = format!(
        "name,url,ingredients\n\"Борщ\",{}/borscht,\"{{'Свекла': '2 шт', 'Капуста': '300 г'}}\"\n",
        server.url()
    );

    let (status, body) = post_json(
        app_with(&raw_dataset),
        "/get-recipes",
        json!({ "ingredients": ["свекла", "капуста"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Борщ");
    assert_eq!(results[0]["match_info"], "2 of 2 ingredients");
    assert_eq!(results[0]["calories"], "1500 ккал");
    assert_eq!(results[0]["proteins"], "50 г");
    assert_eq!(results[0]["fats"], "80 г");
    assert_eq!(results[0]["carbs"], "120 г");
    assert_eq!(results[0]["calories100g"], "90 ккал");
}

#[tokio::test]
async fn test_results_are_capped_at_five() {
    let mut raw_dataset = String::from("name,url,ingredients\n");
    for i in 0..7 {
        raw_dataset.push_str(&format!(
            "\"Блюдо {i}\",http://127.0.0.1:1/{i},\"{{'Соль': '1 ч.л.'}}\"\n"
        ));
    }

    let (status, body) = post_json(
        app_with(&raw_dataset),
        "/get-recipes",
        json!({ "ingredients": ["соль"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 5);
    // Full ties keep dataset order.
    assert_eq!(results[0]["name"], "Блюдо 0");
    assert_eq!(results[4]["name"], "Блюдо 4");
}
