use crate::error::AppError;
use crate::models::{
    LearningPath, LearningPathCreate, LearningPathItem, LearningPathItemCreate, LearningPathItemRow, LearningPathQuery,
    LearningPathRow, LearningPathUpdate,
};
use crate::store::now_text;
use sqlx::{Any, AnyPool, Transaction};
use std::collections::HashMap;

const PATH_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, learning_path_id, item_type, title, description, resource_url, \
                            estimated_duration, item_order, is_completed, created_at";

/// User-owned learning paths and their items. Every call is scoped to `user_id`.
pub struct LearningPathService;

impl LearningPathService {
    /// List paths with items; skip (default 0), limit (default 100, max 1000), optional status filter.
    pub async fn list(pool: &AnyPool, user_id: i64, query: &LearningPathQuery) -> Result<Vec<LearningPath>, AppError> {
        const DEFAULT_LIMIT: u32 = 100;
        let limit = i64::from(query.limit.unwrap_or(DEFAULT_LIMIT).min(1000));
        let skip = i64::from(query.skip);
        let rows = match query.status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM learning_paths WHERE user_id = $1 AND status = $2 ORDER BY id LIMIT $3 OFFSET $4",
                    PATH_COLUMNS
                );
                sqlx::query_as::<_, LearningPathRow>(&sql)
                    .bind(user_id)
                    .bind(status.as_str())
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM learning_paths WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
                    PATH_COLUMNS
                );
                sqlx::query_as::<_, LearningPathRow>(&sql)
                    .bind(user_id)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(pool)
                    .await?
            }
        };
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut items = Self::items_for(pool, &ids).await?;
        rows.into_iter()
            .map(|row| {
                let path_items = items.remove(&row.id).unwrap_or_default();
                row.into_path(path_items)
            })
            .collect()
    }

    pub async fn get(pool: &AnyPool, user_id: i64, id: i64) -> Result<LearningPath, AppError> {
        let row = Self::find_row(pool, user_id, id).await?;
        let mut items = Self::items_for(pool, &[row.id]).await?;
        let path_items = items.remove(&row.id).unwrap_or_default();
        row.into_path(path_items)
    }

    /// Insert the path and its items atomically.
    pub async fn create(pool: &AnyPool, user_id: i64, body: &LearningPathCreate) -> Result<LearningPath, AppError> {
        let now = now_text();
        let mut tx = pool.begin().await?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO learning_paths (user_id, title, description, status, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user_id)
        .bind(body.title.trim())
        .bind(body.description.as_deref())
        .bind(body.status.as_str())
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;
        for item in &body.items {
            insert_item(&mut tx, id, item, &now).await?;
        }
        tx.commit().await?;
        tracing::info!(learning_path_id = id, user_id, items = body.items.len(), "learning path created");
        Self::get(pool, user_id, id).await
    }

    /// Apply the present fields and stamp `updated_at`.
    pub async fn update(
        pool: &AnyPool,
        user_id: i64,
        id: i64,
        body: &LearningPathUpdate,
    ) -> Result<LearningPath, AppError> {
        let current = Self::find_row(pool, user_id, id).await?;
        let title = body.title.as_deref().map(str::trim).unwrap_or(&current.title).to_string();
        // An empty description clears it.
        let description = match body.description.as_deref().map(str::trim) {
            Some("") => None,
            Some(text) => Some(text.to_string()),
            None => current.description,
        };
        let status = match body.status {
            Some(status) => status.as_str().to_string(),
            None => current.status,
        };
        sqlx::query(
            "UPDATE learning_paths SET title = $1, description = $2, status = $3, updated_at = $4 \
             WHERE id = $5 AND user_id = $6",
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(now_text())
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Self::get(pool, user_id, id).await
    }

    pub async fn delete(pool: &AnyPool, user_id: i64, id: i64) -> Result<(), AppError> {
        Self::find_row(pool, user_id, id).await?;
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM learning_path_items WHERE learning_path_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM learning_paths WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(learning_path_id = id, user_id, "learning path deleted");
        Ok(())
    }

    pub async fn add_item(
        pool: &AnyPool,
        user_id: i64,
        learning_path_id: i64,
        item: &LearningPathItemCreate,
    ) -> Result<LearningPathItem, AppError> {
        Self::find_row(pool, user_id, learning_path_id).await?;
        let now = now_text();
        let mut tx = pool.begin().await?;
        let row = insert_item(&mut tx, learning_path_id, item, &now).await?;
        sqlx::query("UPDATE learning_paths SET updated_at = $1 WHERE id = $2")
            .bind(&now)
            .bind(learning_path_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        row.try_into()
    }

    async fn find_row(pool: &AnyPool, user_id: i64, id: i64) -> Result<LearningPathRow, AppError> {
        let sql = format!("SELECT {} FROM learning_paths WHERE id = $1 AND user_id = $2", PATH_COLUMNS);
        sqlx::query_as::<_, LearningPathRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Learning path not found".into()))
    }

    /// Batch-load items for several paths, grouped by path id and sorted by order.
    async fn items_for(pool: &AnyPool, path_ids: &[i64]) -> Result<HashMap<i64, Vec<LearningPathItem>>, AppError> {
        let mut grouped: HashMap<i64, Vec<LearningPathItem>> = HashMap::new();
        if path_ids.is_empty() {
            return Ok(grouped);
        }
        let placeholders: Vec<String> = (1..=path_ids.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "SELECT {} FROM learning_path_items WHERE learning_path_id IN ({}) \
             ORDER BY learning_path_id, item_order, id",
            ITEM_COLUMNS,
            placeholders.join(", ")
        );
        tracing::debug!(sql = %sql, paths = path_ids.len(), "load items");
        let mut query = sqlx::query_as::<_, LearningPathItemRow>(&sql);
        for id in path_ids {
            query = query.bind(*id);
        }
        for row in query.fetch_all(pool).await? {
            let item = LearningPathItem::try_from(row)?;
            grouped.entry(item.learning_path_id).or_default().push(item);
        }
        Ok(grouped)
    }
}

async fn insert_item(
    tx: &mut Transaction<'_, Any>,
    learning_path_id: i64,
    item: &LearningPathItemCreate,
    created_at: &str,
) -> Result<LearningPathItemRow, AppError> {
    let sql = format!(
        "INSERT INTO learning_path_items (learning_path_id, item_type, title, description, resource_url, \
         estimated_duration, item_order, is_completed, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
        ITEM_COLUMNS
    );
    let row = sqlx::query_as::<_, LearningPathItemRow>(&sql)
        .bind(learning_path_id)
        .bind(item.item_type.as_str())
        .bind(item.title.trim())
        .bind(item.description.as_deref())
        .bind(item.resource_url.as_deref())
        .bind(item.estimated_duration)
        .bind(item.order)
        .bind(i64::from(item.is_completed))
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row)
}
