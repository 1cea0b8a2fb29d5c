use rust_decimal::Decimal;

use super::{
    dto::{NameRef, RecipeListQuery, RecipePatch, RecipePayload},
    repo_types::{NewRecipe, RecipeChanges, RecipeFilter},
};
use crate::{
    attrs::services::clean_name,
    error::{ApiError, ApiResult},
};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LINK_LEN: usize = 255;
const PRICE_DECIMAL_PLACES: u32 = 2;

pub fn clean_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("title: This field may not be blank."));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::bad_request(format!(
            "title: Ensure this field has no more than {MAX_TITLE_LEN} characters."
        )));
    }
    Ok(title.to_string())
}

pub fn check_time_minutes(minutes: i32) -> ApiResult<i32> {
    if minutes < 0 {
        return Err(ApiError::bad_request(
            "time_minutes: Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(minutes)
}

/// Prices fit NUMERIC(5, 2): at most two decimal places, below 1000.
pub fn normalize_price(price: Decimal) -> ApiResult<Decimal> {
    if price.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(ApiError::bad_request(
            "price: Ensure that there are no more than 2 decimal places.",
        ));
    }
    if price.abs() >= Decimal::new(1000, 0) {
        return Err(ApiError::bad_request(
            "price: Ensure that there are no more than 3 digits before the decimal point.",
        ));
    }
    let mut price = price;
    price.rescale(PRICE_DECIMAL_PLACES);
    Ok(price)
}

pub fn clean_link(link: &str) -> ApiResult<String> {
    let link = link.trim();
    if link.chars().count() > MAX_LINK_LEN {
        return Err(ApiError::bad_request(format!(
            "link: Ensure this field has no more than {MAX_LINK_LEN} characters."
        )));
    }
    Ok(link.to_string())
}

/// Clean nested names, dropping repeats while keeping first-seen order.
pub fn clean_names(refs: &[NameRef]) -> ApiResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(refs.len());
    for r in refs {
        let name = clean_name(&r.name)?;
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

/// Parse a comma separated id list such as `1,2,3`.
pub fn parse_ids(field: &str, raw: Option<&str>) -> ApiResult<Vec<i64>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("{field}: '{s}' is not a valid id.")))
        })
        .collect()
}

pub fn new_recipe(payload: RecipePayload) -> ApiResult<NewRecipe> {
    Ok(NewRecipe {
        title: clean_title(&payload.title)?,
        description: payload.description.trim().to_string(),
        time_minutes: check_time_minutes(payload.time_minutes)?,
        price: normalize_price(payload.price)?,
        link: clean_link(&payload.link)?,
        tags: clean_names(&payload.tags)?,
        ingredients: clean_names(&payload.ingredients)?,
    })
}

/// A PUT replaces every field, so it is a change set with everything present.
pub fn full_changes(payload: RecipePayload) -> ApiResult<RecipeChanges> {
    let new = new_recipe(payload)?;
    Ok(RecipeChanges {
        title: Some(new.title),
        description: Some(new.description),
        time_minutes: Some(new.time_minutes),
        price: Some(new.price),
        link: Some(new.link),
        tags: Some(new.tags),
        ingredients: Some(new.ingredients),
    })
}

pub fn partial_changes(patch: RecipePatch) -> ApiResult<RecipeChanges> {
    Ok(RecipeChanges {
        title: patch.title.as_deref().map(clean_title).transpose()?,
        description: patch.description.map(|d| d.trim().to_string()),
        time_minutes: patch.time_minutes.map(check_time_minutes).transpose()?,
        price: patch.price.map(normalize_price).transpose()?,
        link: patch.link.as_deref().map(clean_link).transpose()?,
        tags: patch.tags.as_deref().map(clean_names).transpose()?,
        ingredients: patch.ingredients.as_deref().map(clean_names).transpose()?,
    })
}

pub fn filter_from_query(q: &RecipeListQuery) -> ApiResult<RecipeFilter> {
    Ok(RecipeFilter {
        tags: parse_ids("tags", q.tags.as_deref())?,
        ingredients: parse_ids("ingredients", q.ingredients.as_deref())?,
    })
}
