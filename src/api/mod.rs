pub mod pagination;
pub mod validate;
