pub mod auth;
pub mod categories;
pub mod collaborators;
pub mod items;
pub mod lists;
pub mod meal_plans;
pub mod pantry;
pub mod recipes;
pub mod stores;
