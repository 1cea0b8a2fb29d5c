use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo_types::Recipe;
use crate::attrs::AttrResponse;

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<AttrResponse>,
    pub ingredients: Vec<AttrResponse>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub description: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.row.id,
            title: r.row.title,
            time_minutes: r.row.time_minutes,
            price: r.row.price,
            link: r.row.link,
            tags: r.tags.into_iter().map(AttrResponse::from).collect(),
            ingredients: r.ingredients.into_iter().map(AttrResponse::from).collect(),
        }
    }
}

impl From<Recipe> for RecipeDetailResponse {
    fn from(mut r: Recipe) -> Self {
        let description = std::mem::take(&mut r.row.description);
        Self {
            recipe: r.into(),
            description,
        }
    }
}

/// Nested `{name}` reference to a tag or ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// Body for create (POST) and full update (PUT).
#[derive(Debug, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<NameRef>,
    #[serde(default)]
    pub ingredients: Vec<NameRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<NameRef>>,
    pub ingredients: Option<Vec<NameRef>>,
}

/// `?tags=1,2&ingredients=3`
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}
