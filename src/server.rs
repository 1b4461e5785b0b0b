use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::dataset::{normalize, Dataset};
use crate::error::AppError;
use crate::model::NutritionRecord;
use crate::nutrition::NutritionFetcher;
use crate::ranking::{self, TOP_RECIPES};

/// Shared application state. The dataset and the HTTP client are built once
/// at startup; request handlers only ever read them.
pub struct AppState {
    pub dataset: Dataset,
    pub fetcher: NutritionFetcher,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check-ingredient", post(check_ingredient))
        .route("/get-recipes", post(get_recipes))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Debug, Deserialize)]
pub struct CheckIngredientRequest {
    pub ingredient: String,
}

#[derive(Debug, Serialize)]
pub struct CheckIngredientResponse {
    pub status: IngredientStatus,
    /// The normalized form the check ran against.
    pub ingredient: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngredientStatus {
    Found,
    NotFound,
}

async fn check_ingredient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckIngredientRequest>,
) -> Json<CheckIngredientResponse> {
    let ingredient = normalize(&request.ingredient);
    let status = if state.dataset.contains(&ingredient) {
        IngredientStatus::Found
    } else {
        IngredientStatus::NotFound
    };

    Json(CheckIngredientResponse { status, ingredient })
}

#[derive(Debug, Deserialize)]
pub struct GetRecipesRequest {
    pub ingredients: Vec<String>,
}

/// One recipe in the lookup response, nutrition fields flattened alongside.
#[derive(Debug, Serialize)]
pub struct RecipeResult {
    pub name: String,
    pub url: String,
    pub match_info: String,
    #[serde(flatten)]
    pub nutrition: NutritionRecord,
}

async fn get_recipes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetRecipesRequest>,
) -> Result<Json<Vec<RecipeResult>>, AppError> {
    if request.ingredients.is_empty() {
        return Err(AppError::EmptyIngredients);
    }

    let user_ingredients: HashSet<String> =
        request.ingredients.iter().map(|i| normalize(i)).collect();

    let ranked = ranking::rank(&state.dataset, &user_ingredients, TOP_RECIPES);

    let urls: Vec<String> = ranked.iter().map(|m| m.recipe.url.clone()).collect();
    let nutrition = state.fetcher.fetch_batch(&urls).await;

    let results = ranked
        .iter()
        .zip(nutrition)
        .map(|(scored, nutrition)| RecipeResult {
            name: scored.recipe.name.clone(),
            url: scored.recipe.url.clone(),
            match_info: scored.match_info(),
            nutrition,
        })
        .collect();

    Ok(Json(results))
}
