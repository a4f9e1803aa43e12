//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity (菜品分类)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_veg: bool,
    /// Free-form cuisine label (e.g. "Coastal", "Continental")
    pub cuisine_type: String,
    pub created_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_veg: bool,
    #[serde(default)]
    pub cuisine_type: String,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_veg: Option<bool>,
    pub cuisine_type: Option<String>,
}
