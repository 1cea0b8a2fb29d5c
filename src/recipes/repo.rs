use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeRow};
use crate::attrs::{Attr, AttrKind};
use crate::db::PgStore;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Owner's recipes, newest id first, each at most once.
    async fn list_recipes(&self, user_id: Uuid, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>>;
    async fn get_recipe(&self, user_id: Uuid, id: i64) -> anyhow::Result<Option<Recipe>>;
    async fn create_recipe(&self, user_id: Uuid, new: NewRecipe) -> anyhow::Result<Recipe>;
    async fn update_recipe(
        &self,
        user_id: Uuid,
        id: i64,
        changes: RecipeChanges,
    ) -> anyhow::Result<Option<Recipe>>;
    async fn delete_recipe(&self, user_id: Uuid, id: i64) -> anyhow::Result<bool>;
}

const RECIPE_COLUMNS: &str =
    "r.id, r.user_id, r.title, r.description, r.time_minutes, r.price, r.link, r.created_at";

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self, user_id: Uuid, filter: &RecipeFilter) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
              FROM recipes r
             WHERE r.user_id = $1
               AND (cardinality($2::BIGINT[]) = 0 OR EXISTS (
                    SELECT 1 FROM recipe_tags rt
                     WHERE rt.recipe_id = r.id AND rt.tag_id = ANY($2)))
               AND (cardinality($3::BIGINT[]) = 0 OR EXISTS (
                    SELECT 1 FROM recipe_ingredients ri
                     WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY($3)))
             ORDER BY r.id DESC
            "#
        ))
        .bind(user_id)
        .bind(&filter.tags)
        .bind(&filter.ingredients)
        .fetch_all(&self.pool)
        .await
        .context("list recipes")?;

        self.attach_attrs(rows).await
    }

    async fn get_recipe(&self, user_id: Uuid, id: i64) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1 AND r.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("get recipe")?;

        match row {
            Some(row) => Ok(self.attach_attrs(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_recipe(&self, user_id: Uuid, new: NewRecipe) -> anyhow::Result<Recipe> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO recipes (user_id, title, description, time_minutes, price, link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.time_minutes)
        .bind(new.price)
        .bind(&new.link)
        .fetch_one(&mut *tx)
        .await
        .context("insert recipe")?;

        link_by_name(&mut tx, AttrKind::Tag, user_id, id, &new.tags).await?;
        link_by_name(&mut tx, AttrKind::Ingredient, user_id, id, &new.ingredients).await?;
        tx.commit().await.context("commit tx")?;

        self.get_recipe(user_id, id)
            .await?
            .context("recipe vanished after insert")
    }

    async fn update_recipe(
        &self,
        user_id: Uuid,
        id: i64,
        changes: RecipeChanges,
    ) -> anyhow::Result<Option<Recipe>> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE recipes
               SET title        = COALESCE($3, title),
                   description  = COALESCE($4, description),
                   time_minutes = COALESCE($5, time_minutes),
                   price        = COALESCE($6, price),
                   link         = COALESCE($7, link)
             WHERE id = $1 AND user_id = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.time_minutes)
        .bind(changes.price)
        .bind(changes.link)
        .fetch_optional(&mut *tx)
        .await
        .context("update recipe")?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(names) = changes.tags {
            unlink_all(&mut tx, AttrKind::Tag, id).await?;
            link_by_name(&mut tx, AttrKind::Tag, user_id, id, &names).await?;
        }
        if let Some(names) = changes.ingredients {
            unlink_all(&mut tx, AttrKind::Ingredient, id).await?;
            link_by_name(&mut tx, AttrKind::Ingredient, user_id, id, &names).await?;
        }
        tx.commit().await.context("commit tx")?;

        self.get_recipe(user_id, id).await
    }

    async fn delete_recipe(&self, user_id: Uuid, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("delete recipe")?;
        Ok(res.rows_affected() > 0)
    }
}

impl PgStore {
    /// Load tags and ingredients for `rows` with one query per kind.
    async fn attach_attrs(&self, rows: Vec<RecipeRow>) -> anyhow::Result<Vec<Recipe>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut tags = self.attrs_by_recipe(AttrKind::Tag, &ids).await?;
        let mut ingredients = self.attrs_by_recipe(AttrKind::Ingredient, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| Recipe {
                tags: tags.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                row,
            })
            .collect())
    }

    async fn attrs_by_recipe(
        &self,
        kind: AttrKind,
        recipe_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<Attr>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            r#"
            SELECT l.recipe_id, a.id, a.user_id, a.name
              FROM {link} l
              JOIN {table} a ON a.id = l.{column}
             WHERE l.recipe_id = ANY($1)
             ORDER BY a.id ASC
            "#,
            link = kind.link_table(),
            table = kind.table(),
            column = kind.link_column(),
        );
        let rows: Vec<(i64, i64, Uuid, String)> = sqlx::query_as(&sql)
            .bind(recipe_ids)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("load {} for recipes", kind.table()))?;

        let mut out: HashMap<i64, Vec<Attr>> = HashMap::new();
        for (recipe_id, id, user_id, name) in rows {
            out.entry(recipe_id).or_default().push(Attr { id, user_id, name });
        }
        Ok(out)
    }
}

/// Resolve each name to the owner's record (lowest id wins on duplicate
/// names), creating missing ones, and link them to the recipe.
async fn link_by_name(
    tx: &mut Transaction<'_, Postgres>,
    kind: AttrKind,
    user_id: Uuid,
    recipe_id: i64,
    names: &[String],
) -> anyhow::Result<()> {
    let find_sql = format!(
        "SELECT id FROM {} WHERE user_id = $1 AND name = $2 ORDER BY id ASC LIMIT 1",
        kind.table()
    );
    let insert_sql = format!(
        "INSERT INTO {} (user_id, name) VALUES ($1, $2) RETURNING id",
        kind.table()
    );
    let link_sql = format!(
        "INSERT INTO {} (recipe_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        kind.link_table(),
        kind.link_column()
    );

    for name in names {
        let existing: Option<(i64,)> = sqlx::query_as(&find_sql)
            .bind(user_id)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .with_context(|| format!("find {}", kind.label()))?;

        let attr_id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (i64,) = sqlx::query_as(&insert_sql)
                    .bind(user_id)
                    .bind(name)
                    .fetch_one(&mut **tx)
                    .await
                    .with_context(|| format!("insert {}", kind.label()))?;
                id
            }
        };

        sqlx::query(&link_sql)
            .bind(recipe_id)
            .bind(attr_id)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("link {}", kind.label()))?;
    }
    Ok(())
}

async fn unlink_all(
    tx: &mut Transaction<'_, Postgres>,
    kind: AttrKind,
    recipe_id: i64,
) -> anyhow::Result<()> {
    sqlx::query(&format!("DELETE FROM {} WHERE recipe_id = $1", kind.link_table()))
        .bind(recipe_id)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("unlink {}", kind.table()))?;
    Ok(())
}
