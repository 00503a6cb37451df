use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::error::StoreError;
use super::update::UpdateBuilder;
use super::value::{bind_value, bind_value_scalar, SqlValue};

/// A resource type managed by the store: one table, one owner column, fixed
/// payload columns, and a designated text column for substring search.
///
/// `TABLE`, `COLUMNS` and `INSERT_COLUMNS` are trusted compile-time
/// identifiers; only values are ever bound at runtime.
pub trait StoredResource: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Schema-qualified table name, e.g. `proxys.proxy_list`.
    const TABLE: &'static str;

    /// Full select list returned to callers.
    const COLUMNS: &'static str;

    /// Payload columns in insert order, excluding id/user_id/timestamps.
    const INSERT_COLUMNS: &'static str;

    /// Column matched by the case-insensitive substring search.
    const SEARCH_COLUMN: &'static str;

    /// Validated payload for `create`.
    type Create: Send + Sync;

    /// Sparse payload for partial update; absent fields stay unchanged.
    type Patch: Send + Sync;

    /// Values for `INSERT_COLUMNS`, in the same order.
    fn insert_values(input: &Self::Create) -> Vec<SqlValue>;

    /// Push one assignment per supplied patch field into the builder.
    fn apply_patch(patch: &Self::Patch, update: &mut UpdateBuilder);
}

/// Limit/offset window for search, bounded so a caller can never ask for an
/// unbounded scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn bounded(limit: Option<i64>, offset: Option<i64>, default: i64, max: i64) -> Self {
        let limit = limit.unwrap_or(default).clamp(1, max);
        let offset = offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }
}

/// Owner-scoped transactional store for one resource type.
///
/// Every operation is an independent unit of work: acquire a connection from
/// the pool, run the statement(s) inside a transaction where anything is
/// written, commit or roll back, release. The pool is an explicit dependency
/// handed in at construction; the store keeps no other state.
#[derive(Clone)]
pub struct ResourceStore<R: StoredResource> {
    pool: PgPool,
    _resource: std::marker::PhantomData<R>,
}

impl<R: StoredResource> ResourceStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// May `owner_id` act on row `id`? One existence probe scoped by both.
    /// False covers "not yours" and "does not exist" alike; driver failures
    /// are infrastructure errors, never a silent denial.
    pub async fn is_eligible(&self, owner_id: &str, id: Uuid) -> Result<bool, StoreError> {
        let eligible: bool = sqlx::query_scalar(&exists_sql(R::TABLE))
            .bind(id)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(eligible)
    }

    /// Insert one row inside a transaction and return the generated id.
    pub async fn create(&self, owner_id: &str, input: &R::Create) -> Result<Uuid, StoreError> {
        let values = R::insert_values(input);
        let sql = insert_sql(R::TABLE, R::INSERT_COLUMNS, values.len());

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query_scalar::<_, Uuid>(&sql).bind(owner_id);
        for value in &values {
            query = bind_value_scalar(query, value);
        }
        let id = query.fetch_one(&mut *tx).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Read one row by id, gated on ownership. `Ok(None)` means the row
    /// vanished between the eligibility check and the read.
    pub async fn fetch(&self, owner_id: &str, id: Uuid) -> Result<Option<R>, StoreError> {
        if !self.is_eligible(owner_id, id).await? {
            return Err(StoreError::Forbidden);
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND user_id = $2",
            R::COLUMNS,
            R::TABLE
        );
        let row = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All rows for one owner, newest first. Empty is a valid result, not an
    /// error; the boundary decides how zero rows render.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<R>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY created_at DESC",
            R::COLUMNS,
            R::TABLE
        );
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Owner rows matching an optional case-insensitive substring filter on
    /// the search column, newest first, windowed by `page`. Zero matches is
    /// an empty vec, same contract as `list`.
    pub async fn search(
        &self,
        owner_id: &str,
        filter: Option<&str>,
        page: Page,
    ) -> Result<Vec<R>, StoreError> {
        let sql = search_sql(R::TABLE, R::COLUMNS, R::SEARCH_COLUMN);
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(filter)
            .bind(owner_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Partially update one row, gated on ownership.
    ///
    /// An empty patch short-circuits to `Ok(None)` before any transaction is
    /// opened. Otherwise the assignments run in a transaction that must
    /// affect exactly one row; zero rows means the row was deleted after the
    /// eligibility check, which rolls back and reports `NoAffectedRow`.
    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        patch: &R::Patch,
    ) -> Result<Option<R>, StoreError> {
        if !self.is_eligible(owner_id, id).await? {
            return Err(StoreError::Forbidden);
        }
        self.apply_update(id, patch).await
    }

    /// The transactional half of `update`, past the ownership gate. The
    /// caller must already have established eligibility; between that check
    /// and this statement the row can vanish, which is the one path that
    /// produces `NoAffectedRow`.
    pub async fn apply_update(&self, id: Uuid, patch: &R::Patch) -> Result<Option<R>, StoreError> {
        let mut update = UpdateBuilder::new();
        R::apply_patch(patch, &mut update);
        if update.is_empty() {
            return Ok(None);
        }
        let (sql, params) = update.into_sql(R::TABLE, R::COLUMNS);

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query_as::<_, R>(&sql).bind(id);
        for param in &params {
            query = bind_value(query, param);
        }
        let row = query.fetch_optional(&mut *tx).await?;

        match row {
            Some(row) => {
                tx.commit().await?;
                Ok(Some(row))
            }
            None => {
                // Swallow rollback failures so the row-count violation stays
                // the surfaced error.
                let _ = tx.rollback().await;
                Err(StoreError::NoAffectedRow)
            }
        }
    }

    /// Delete one row, gated on ownership; returns the deleted id as
    /// confirmation. Zero affected rows rolls back and reports `NotFound`.
    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<Uuid, StoreError> {
        if !self.is_eligible(owner_id, id).await? {
            return Err(StoreError::Forbidden);
        }

        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", R::TABLE);

        let mut tx = self.pool.begin().await?;
        let deleted: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        match deleted {
            Some(deleted_id) => {
                tx.commit().await?;
                Ok(deleted_id)
            }
            None => {
                let _ = tx.rollback().await;
                Err(StoreError::NotFound)
            }
        }
    }
}

fn exists_sql(table: &str) -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND user_id = $2)",
        table
    )
}

fn insert_sql(table: &str, insert_columns: &str, value_count: usize) -> String {
    // $1 is user_id; payload values follow
    let placeholders: Vec<String> = (2..value_count + 2).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} (user_id, {}) VALUES ($1, {}) RETURNING id",
        table,
        insert_columns,
        placeholders.join(", ")
    )
}

fn search_sql(table: &str, columns: &str, search_column: &str) -> String {
    format!(
        "SELECT {} FROM {} \
         WHERE user_id = $2 AND ($1::text IS NULL OR {} ILIKE '%' || $1 || '%') \
         ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        columns, table, search_column
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_probe_is_scoped_by_id_and_owner() {
        let sql = exists_sql("proxys.proxy_list");
        assert_eq!(
            sql,
            "SELECT EXISTS (SELECT 1 FROM proxys.proxy_list WHERE id = $1 AND user_id = $2)"
        );
    }

    #[test]
    fn insert_places_owner_first() {
        let sql = insert_sql("proxys.proxy_list", "name, start_date", 2);
        assert_eq!(
            sql,
            "INSERT INTO proxys.proxy_list (user_id, name, start_date) \
             VALUES ($1, $2, $3) RETURNING id"
        );
    }

    #[test]
    fn search_tolerates_absent_filter() {
        let sql = search_sql("reminders.reminder_list", "id, name", "name");
        assert!(sql.contains("($1::text IS NULL OR name ILIKE '%' || $1 || '%')"));
        assert!(sql.contains("ORDER BY created_at DESC LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn page_clamps_to_bounds() {
        let page = Page::bounded(Some(500), Some(-3), 20, 40);
        assert_eq!(page, Page { limit: 40, offset: 0 });

        let page = Page::bounded(None, None, 20, 40);
        assert_eq!(page, Page { limit: 20, offset: 0 });

        let page = Page::bounded(Some(0), Some(10), 20, 40);
        assert_eq!(page, Page { limit: 1, offset: 10 });
    }
}
