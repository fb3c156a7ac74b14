use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::pagination::Pagination;
use crate::models::{Recipe, RecipeDetails, RecipeIngredient};

use super::ServiceError;

#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub servings: Option<i32>,
    pub is_public: Option<bool>,
    pub ingredients: Vec<NewIngredient>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub servings: Option<i32>,
    pub is_public: Option<bool>,
    /// When present, replaces the whole ingredient collection
    pub ingredients: Option<Vec<NewIngredient>>,
}

#[derive(Clone)]
pub struct RecipeService {
    pool: PgPool,
}

impl RecipeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        page: &Pagination,
        search: Option<&str>,
    ) -> Result<(Vec<Recipe>, i64), ServiceError> {
        let recipes = sqlx::query_as::<_, Recipe>(
            "SELECT * FROM recipes \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%') \
             ORDER BY updated_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM recipes \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')",
        )
        .bind(user_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((recipes, total))
    }

    /// Own recipes and public recipes are readable; everything else is 404
    pub async fn get_by_id(&self, recipe_id: Uuid, user_id: Uuid) -> Result<Recipe, ServiceError> {
        let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("Recipe"))?;

        if recipe.owner_id != user_id && !recipe.is_public {
            return Err(ServiceError::NotFound("Recipe"));
        }
        Ok(recipe)
    }

    pub async fn get_with_details(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<RecipeDetails, ServiceError> {
        let recipe = self.get_by_id(recipe_id, user_id).await?;
        let ingredients = self.ingredients_of(recipe_id).await?;
        Ok(RecipeDetails { recipe, ingredients })
    }

    /// Visibility defaults to private; ingredient sort order defaults to 0
    pub async fn create(
        &self,
        owner_id: Uuid,
        recipe: NewRecipe,
    ) -> Result<RecipeDetails, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Recipe>(
            "INSERT INTO recipes (owner_id, name, description, instructions, servings, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(owner_id)
        .bind(recipe.name)
        .bind(recipe.description)
        .bind(recipe.instructions)
        .bind(recipe.servings)
        .bind(recipe.is_public.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        let ingredients =
            Self::insert_ingredients(&mut tx, created.id, recipe.ingredients).await?;

        tx.commit().await?;
        Ok(RecipeDetails { recipe: created, ingredients })
    }

    pub async fn update(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        patch: RecipePatch,
    ) -> Result<RecipeDetails, ServiceError> {
        self.require_owner(recipe_id, user_id).await?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Recipe>(
            "UPDATE recipes SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 instructions = COALESCE($4, instructions), \
                 servings = COALESCE($5, servings), \
                 is_public = COALESCE($6, is_public), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(recipe_id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.instructions)
        .bind(patch.servings)
        .bind(patch.is_public)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Recipe"))?;

        let ingredients = match patch.ingredients {
            Some(replacement) => {
                sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                    .bind(recipe_id)
                    .execute(&mut *tx)
                    .await?;
                Self::insert_ingredients(&mut tx, recipe_id, replacement).await?
            }
            None => {
                sqlx::query_as::<_, RecipeIngredient>(
                    "SELECT * FROM recipe_ingredients WHERE recipe_id = $1 \
                     ORDER BY sort_order, name",
                )
                .bind(recipe_id)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(RecipeDetails { recipe: updated, ingredients })
    }

    pub async fn delete(&self, recipe_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        self.require_owner(recipe_id, user_id).await?;

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Recipe"));
        }
        Ok(())
    }

    async fn require_owner(&self, recipe_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let recipe = self.get_by_id(recipe_id, user_id).await?;
        if recipe.owner_id != user_id {
            // Public but not theirs: visible, yet not editable
            return Err(ServiceError::Forbidden("Only the owner can modify a recipe".into()));
        }
        Ok(())
    }

    async fn ingredients_of(&self, recipe_id: Uuid) -> Result<Vec<RecipeIngredient>, ServiceError> {
        let ingredients = sqlx::query_as::<_, RecipeIngredient>(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = $1 ORDER BY sort_order, name",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ingredients)
    }

    async fn insert_ingredients(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: Uuid,
        ingredients: Vec<NewIngredient>,
    ) -> Result<Vec<RecipeIngredient>, ServiceError> {
        let mut inserted = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let row = sqlx::query_as::<_, RecipeIngredient>(
                "INSERT INTO recipe_ingredients (recipe_id, name, quantity, unit, sort_order) \
                 VALUES ($1, $2, $3, $4, COALESCE($5, 0)) RETURNING *",
            )
            .bind(recipe_id)
            .bind(ingredient.name)
            .bind(ingredient.quantity)
            .bind(ingredient.unit)
            .bind(ingredient.sort_order)
            .fetch_one(&mut **tx)
            .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }
}
