use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Attr, AttrKind};
use crate::db::PgStore;

/// Persistence for tags and ingredients. Every call is scoped to one owner.
#[async_trait]
pub trait AttrStore: Send + Sync {
    /// Owner's records ordered by name descending, then id descending.
    /// With `assigned_only`, only records linked to at least one of the
    /// owner's recipes, each at most once.
    async fn list_attrs(
        &self,
        kind: AttrKind,
        user_id: Uuid,
        assigned_only: bool,
    ) -> anyhow::Result<Vec<Attr>>;
    async fn create_attr(&self, kind: AttrKind, user_id: Uuid, name: &str) -> anyhow::Result<Attr>;
    async fn get_attr(&self, kind: AttrKind, user_id: Uuid, id: i64) -> anyhow::Result<Option<Attr>>;
    async fn rename_attr(
        &self,
        kind: AttrKind,
        user_id: Uuid,
        id: i64,
        name: &str,
    ) -> anyhow::Result<Option<Attr>>;
    async fn delete_attr(&self, kind: AttrKind, user_id: Uuid, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl AttrStore for PgStore {
    async fn list_attrs(
        &self,
        kind: AttrKind,
        user_id: Uuid,
        assigned_only: bool,
    ) -> anyhow::Result<Vec<Attr>> {
        // EXISTS instead of a join keeps one row per record however many
        // recipes reference it.
        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.name
              FROM {table} a
             WHERE a.user_id = $1
               AND ($2 = FALSE OR EXISTS (
                    SELECT 1
                      FROM {link} l
                      JOIN recipes r ON r.id = l.recipe_id
                     WHERE l.{column} = a.id AND r.user_id = $1
               ))
             ORDER BY a.name DESC, a.id DESC
            "#,
            table = kind.table(),
            link = kind.link_table(),
            column = kind.link_column(),
        );
        let rows = sqlx::query_as::<_, Attr>(&sql)
            .bind(user_id)
            .bind(assigned_only)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("list {}", kind.table()))?;
        Ok(rows)
    }

    async fn create_attr(&self, kind: AttrKind, user_id: Uuid, name: &str) -> anyhow::Result<Attr> {
        let sql = format!(
            "INSERT INTO {} (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name",
            kind.table()
        );
        let row = sqlx::query_as::<_, Attr>(&sql)
            .bind(user_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("insert {}", kind.label()))?;
        Ok(row)
    }

    async fn get_attr(&self, kind: AttrKind, user_id: Uuid, id: i64) -> anyhow::Result<Option<Attr>> {
        let sql = format!(
            "SELECT id, user_id, name FROM {} WHERE id = $1 AND user_id = $2",
            kind.table()
        );
        let row = sqlx::query_as::<_, Attr>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("get {}", kind.label()))?;
        Ok(row)
    }

    async fn rename_attr(
        &self,
        kind: AttrKind,
        user_id: Uuid,
        id: i64,
        name: &str,
    ) -> anyhow::Result<Option<Attr>> {
        let sql = format!(
            "UPDATE {} SET name = $3 WHERE id = $1 AND user_id = $2 RETURNING id, user_id, name",
            kind.table()
        );
        let row = sqlx::query_as::<_, Attr>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("rename {}", kind.label()))?;
        Ok(row)
    }

    async fn delete_attr(&self, kind: AttrKind, user_id: Uuid, id: i64) -> anyhow::Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());
        let res = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("delete {}", kind.label()))?;
        Ok(res.rows_affected() > 0)
    }
}
