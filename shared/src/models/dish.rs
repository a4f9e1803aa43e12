//! Dish Model

use serde::{Deserialize, Serialize};

/// Tag used by the menu page for the highlighted dishes strip
pub const BEST_SELLER_TAG: &str = "Best Seller";

/// Dish entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub is_spicy: bool,
    /// JSON array of free-form tags (e.g. ["Best Seller", "Chef Special"])
    #[cfg_attr(feature = "db", sqlx(json))]
    pub tags: Vec<String>,
    pub category_id: Option<i64>,
    pub created_at: i64,
}

impl Dish {
    /// Whether the dish carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_spicy: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: Option<i64>,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub is_spicy: Option<bool>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the category
    #[serde(default, with = "double_option")]
    pub category_id: Option<Option<i64>>,
}

/// Menu listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishQuery {
    pub category_id: Option<i64>,
    pub tag: Option<String>,
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
