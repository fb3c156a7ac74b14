use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::pagination::{PageMeta, PageQuery, Pagination};
use crate::api::validate::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Recipe, RecipeDetails};
use crate::services::{NewIngredient, NewRecipe, RecipePatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecipeIndexQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    #[validate(required(message = "name is required"), length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[validate(range(min = 1, message = "servings must be at least 1"))]
    pub servings: Option<i32>,
    pub is_public: Option<bool>,
    #[validate(nested)]
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[validate(range(min = 1, message = "servings must be at least 1"))]
    pub servings: Option<i32>,
    pub is_public: Option<bool>,
    #[validate(nested)]
    pub ingredients: Option<Vec<IngredientRequest>>,
}

fn into_ingredients(requests: Vec<IngredientRequest>) -> Vec<NewIngredient> {
    requests
        .into_iter()
        .map(|i| NewIngredient {
            name: i.name.unwrap_or_default(),
            quantity: i.quantity,
            unit: i.unit,
            sort_order: i.sort_order,
        })
        .collect()
}

/// GET /api/v1/recipes - The requester's recipes, paginated
pub async fn index(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RecipeIndexQuery>,
) -> ApiResult<Vec<Recipe>> {
    let page = Pagination::from_query(&query.page);
    let (recipes, total) = state
        .recipes
        .get_by_user(auth.user_id, &page, query.search.as_deref())
        .await?;
    Ok(ApiResponse::paginated(recipes, PageMeta::new(&page, total)))
}

/// POST /api/v1/recipes
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateRecipeRequest>,
) -> ApiResult<RecipeDetails> {
    let recipe = NewRecipe {
        name: body.name.unwrap_or_default(),
        description: body.description,
        instructions: body.instructions,
        servings: body.servings,
        is_public: body.is_public,
        ingredients: into_ingredients(body.ingredients),
    };

    let created = state.recipes.create(auth.user_id, recipe).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/v1/recipes/:id - Own or public recipes, with ingredients
pub async fn show(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(recipe_id): Path<Uuid>,
) -> ApiResult<RecipeDetails> {
    let details = state.recipes.get_with_details(recipe_id, auth.user_id).await?;
    Ok(ApiResponse::success(details))
}

/// PATCH /api/v1/recipes/:id - Owner only; ingredients replace wholesale when given
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(recipe_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateRecipeRequest>,
) -> ApiResult<RecipeDetails> {
    let patch = RecipePatch {
        name: body.name,
        description: body.description,
        instructions: body.instructions,
        servings: body.servings,
        is_public: body.is_public,
        ingredients: body.ingredients.map(into_ingredients),
    };

    let details = state.recipes.update(recipe_id, auth.user_id, patch).await?;
    Ok(ApiResponse::success(details))
}

/// DELETE /api/v1/recipes/:id - Owner only
pub async fn destroy(
    Extension(state): Extension<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(recipe_id): Path<Uuid>,
) -> ApiResult<()> {
    state.recipes.delete(recipe_id, auth.user_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
