use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub notes: Option<String>,
    pub is_checked: bool,
    pub estimated_price: Option<Decimal>,
    pub actual_price: Option<Decimal>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
