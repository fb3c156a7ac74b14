pub mod category;
pub mod collaborator;
pub mod item;
pub mod list;
pub mod meal_plan;
pub mod pantry;
pub mod recipe;
pub mod store;
pub mod user;

pub use category::{Category, CategoryUsage};
pub use collaborator::{Collaborator, CollaboratorRole, ListAccess};
pub use item::ListItem;
pub use list::{ListDetails, ShoppingList};
pub use meal_plan::MealPlan;
pub use pantry::PantryItem;
pub use recipe::{Recipe, RecipeDetails, RecipeIngredient};
pub use store::Store;
pub use user::{User, UserCredentials};
