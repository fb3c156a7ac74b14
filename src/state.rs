use sqlx::PgPool;

use crate::services::{
    CategoryService, CollaborationService, ItemService, ListService, MealPlanService,
    PantryService, RecipeService, StoreService, UserService,
};

/// One logical service per entity type, constructed once at process start
/// with the shared connection pool and stateless thereafter.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserService,
    pub lists: ListService,
    pub items: ItemService,
    pub collaboration: CollaborationService,
    pub recipes: RecipeService,
    pub meal_plans: MealPlanService,
    pub stores: StoreService,
    pub pantry: PantryService,
    pub categories: CategoryService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            lists: ListService::new(pool.clone()),
            items: ItemService::new(pool.clone()),
            collaboration: CollaborationService::new(pool.clone()),
            recipes: RecipeService::new(pool.clone()),
            meal_plans: MealPlanService::new(pool.clone()),
            stores: StoreService::new(pool.clone()),
            pantry: PantryService::new(pool.clone()),
            categories: CategoryService::new(pool.clone()),
            pool,
        }
    }
}
