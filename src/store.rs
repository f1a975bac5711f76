//! SQLite persistence for bakeries and baked goods.

use crate::error::AppError;
use crate::model::{BakedGood, Bakery, NewBakedGood};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::str::FromStr;

/// Store operations used by the HTTP handlers. Each call is one read or one single-row write.
#[async_trait]
pub trait BakeryStore: Send + Sync {
    /// All bakeries in id order, each with its baked goods.
    async fn list_bakeries(&self) -> Result<Vec<Bakery>, AppError>;
    async fn get_bakery(&self, id: i64) -> Result<Option<Bakery>, AppError>;
    /// Inserts a bakery. Bakeries have no HTTP creation route; used for seeding.
    async fn create_bakery(&self, name: &str) -> Result<Bakery, AppError>;
    /// Overwrites the name when `name` is non-empty; otherwise returns the record unchanged.
    async fn update_bakery_name(&self, id: i64, name: Option<&str>) -> Result<Option<Bakery>, AppError>;
    /// All baked goods, price descending, ties by id ascending.
    async fn list_baked_goods_by_price_desc(&self) -> Result<Vec<BakedGood>, AppError>;
    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>, AppError>;
    /// Rejects an unknown `bakery_id` with `AppError::UnknownBakery`.
    async fn create_baked_good(&self, new: &NewBakedGood) -> Result<BakedGood, AppError>;
    /// Returns false when no row had that id.
    async fn delete_baked_good(&self, id: i64) -> Result<bool, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

const BAKED_GOOD_COLUMNS: &str = "id, name, price, bakery_id, created_at";
const BAKERY_COLUMNS: &str = "id, name, created_at";

/// Open a pool for `database_url`, creating the database file if needed and enabling foreign keys.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

/// Create the `bakeries` and `baked_goods` tables if they do not exist.
/// AUTOINCREMENT keeps ids from being reused after deletes.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bakeries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS baked_goods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            bakery_id INTEGER NOT NULL REFERENCES bakeries (id),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS baked_goods_price_idx ON baked_goods (price DESC, id)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Create each named bakery unless one with that name already exists. Returns how many were inserted.
pub async fn seed_bakeries(store: &dyn BakeryStore, names: &[String]) -> Result<usize, AppError> {
    let existing = store.list_bakeries().await?;
    let mut inserted = 0;
    for name in names {
        if existing.iter().any(|b| &b.name == name) {
            tracing::debug!(name = %name, "bakery already seeded");
            continue;
        }
        let bakery = store.create_bakery(name).await?;
        tracing::info!(id = bakery.id, name = %bakery.name, "seeded bakery");
        inserted += 1;
    }
    Ok(inserted)
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Single-connection in-memory database with tables created. The connection is never
    /// recycled, since closing it would drop the data.
    pub async fn in_memory() -> Result<Self, AppError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        ensure_tables(&pool).await?;
        Ok(SqliteStore { pool })
    }

    async fn goods_for_bakery(&self, bakery_id: i64) -> Result<Vec<BakedGood>, AppError> {
        let sql = format!(
            "SELECT {} FROM baked_goods WHERE bakery_id = ? ORDER BY id",
            BAKED_GOOD_COLUMNS
        );
        tracing::debug!(sql = %sql, bakery_id, "query");
        let goods = sqlx::query_as::<_, BakedGood>(&sql)
            .bind(bakery_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(goods)
    }

    async fn bakery_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bakeries WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0 != 0)
    }
}

#[async_trait]
impl BakeryStore for SqliteStore {
    async fn list_bakeries(&self) -> Result<Vec<Bakery>, AppError> {
        let sql = format!("SELECT {} FROM bakeries ORDER BY id", BAKERY_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let mut bakeries = sqlx::query_as::<_, Bakery>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("SELECT {} FROM baked_goods ORDER BY id", BAKED_GOOD_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let goods = sqlx::query_as::<_, BakedGood>(&sql)
            .fetch_all(&self.pool)
            .await?;
        let mut by_bakery: HashMap<i64, Vec<BakedGood>> = HashMap::new();
        for good in goods {
            by_bakery.entry(good.bakery_id).or_default().push(good);
        }
        for bakery in &mut bakeries {
            bakery.baked_goods = by_bakery.remove(&bakery.id).unwrap_or_default();
        }
        Ok(bakeries)
    }

    async fn get_bakery(&self, id: i64) -> Result<Option<Bakery>, AppError> {
        let sql = format!("SELECT {} FROM bakeries WHERE id = ?", BAKERY_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Bakery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(mut bakery) => {
                bakery.baked_goods = self.goods_for_bakery(id).await?;
                Ok(Some(bakery))
            }
            None => Ok(None),
        }
    }

    async fn create_bakery(&self, name: &str) -> Result<Bakery, AppError> {
        let sql = format!(
            "INSERT INTO bakeries (name, created_at) VALUES (?, ?) RETURNING {}",
            BAKERY_COLUMNS
        );
        let bakery = sqlx::query_as::<_, Bakery>(&sql)
            .bind(name)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(bakery)
    }

    async fn update_bakery_name(&self, id: i64, name: Option<&str>) -> Result<Option<Bakery>, AppError> {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            let result = sqlx::query("UPDATE bakeries SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }
            tracing::info!(id, name = %name, "renamed bakery");
        }
        self.get_bakery(id).await
    }

    async fn list_baked_goods_by_price_desc(&self) -> Result<Vec<BakedGood>, AppError> {
        let sql = format!(
            "SELECT {} FROM baked_goods ORDER BY price DESC, id ASC",
            BAKED_GOOD_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let goods = sqlx::query_as::<_, BakedGood>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(goods)
    }

    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>, AppError> {
        let sql = format!(
            "SELECT {} FROM baked_goods ORDER BY price DESC, id ASC LIMIT 1",
            BAKED_GOOD_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let good = sqlx::query_as::<_, BakedGood>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(good)
    }

    async fn create_baked_good(&self, new: &NewBakedGood) -> Result<BakedGood, AppError> {
        if !self.bakery_exists(new.bakery_id).await? {
            return Err(AppError::UnknownBakery(new.bakery_id));
        }
        let sql = format!(
            "INSERT INTO baked_goods (name, price, bakery_id, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
            BAKED_GOOD_COLUMNS
        );
        let good = sqlx::query_as::<_, BakedGood>(&sql)
            .bind(&new.name)
            .bind(new.price)
            .bind(new.bakery_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Bakery removed between the existence check and the insert.
                let fk_violation = e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation());
                if fk_violation {
                    AppError::UnknownBakery(new.bakery_id)
                } else {
                    AppError::Db(e)
                }
            })?;
        tracing::info!(id = good.id, bakery_id = good.bakery_id, "created baked good");
        Ok(good)
    }

    async fn delete_baked_good(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM baked_goods WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(id, "deleted baked good");
        }
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good(name: &str, price: f64, bakery_id: i64) -> NewBakedGood {
        NewBakedGood {
            name: name.into(),
            price,
            bakery_id,
        }
    }

    #[tokio::test]
    async fn price_listing_is_descending_with_id_tie_break() {
        let store = SqliteStore::in_memory().await.unwrap();
        let bakery = store.create_bakery("Sweet Tooth").await.unwrap();
        let a = store.create_baked_good(&good("Bun", 2.0, bakery.id)).await.unwrap();
        let b = store.create_baked_good(&good("Cake", 12.0, bakery.id)).await.unwrap();
        let c = store.create_baked_good(&good("Roll", 2.0, bakery.id)).await.unwrap();

        let ids: Vec<i64> = store
            .list_baked_goods_by_price_desc()
            .await
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
        assert_eq!(store.most_expensive_baked_good().await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn most_expensive_on_empty_table_is_none() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert_eq!(store.most_expensive_baked_good().await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_rejects_unknown_bakery() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = store.create_baked_good(&good("Bun", 1.0, 42)).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownBakery(42)));
    }

    #[tokio::test]
    async fn bakeries_carry_their_own_goods() {
        let store = SqliteStore::in_memory().await.unwrap();
        let first = store.create_bakery("First").await.unwrap();
        let second = store.create_bakery("Second").await.unwrap();
        store.create_baked_good(&good("Pie", 5.0, second.id)).await.unwrap();
        store.create_baked_good(&good("Tart", 4.0, first.id)).await.unwrap();

        let bakeries = store.list_bakeries().await.unwrap();
        assert_eq!(bakeries.len(), 2);
        assert_eq!(bakeries[0].id, first.id);
        assert_eq!(bakeries[0].baked_goods.len(), 1);
        assert_eq!(bakeries[0].baked_goods[0].name, "Tart");
        assert_eq!(bakeries[1].baked_goods[0].name, "Pie");
    }

    #[tokio::test]
    async fn empty_name_leaves_bakery_unchanged() {
        let store = SqliteStore::in_memory().await.unwrap();
        let bakery = store.create_bakery("Original").await.unwrap();

        let same = store.update_bakery_name(bakery.id, Some("")).await.unwrap();
        assert_eq!(same, Some(bakery.clone()));
        let renamed = store.update_bakery_name(bakery.id, Some("Renamed")).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.created_at, bakery.created_at);
        assert_eq!(store.update_bakery_name(999, Some("x")).await.unwrap(), None);
        assert_eq!(store.update_bakery_name(999, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = SqliteStore::in_memory().await.unwrap();
        let bakery = store.create_bakery("B").await.unwrap();
        let first = store.create_baked_good(&good("A", 1.0, bakery.id)).await.unwrap();
        assert!(store.delete_baked_good(first.id).await.unwrap());
        assert!(!store.delete_baked_good(first.id).await.unwrap());
        let next = store.create_baked_good(&good("B", 1.0, bakery.id)).await.unwrap();
        assert!(next.id > first.id);
    }

    #[tokio::test]
    async fn seeding_skips_existing_names() {
        let store = SqliteStore::in_memory().await.unwrap();
        let names = vec!["Sweet Tooth".to_string(), "Crumb".to_string()];
        assert_eq!(seed_bakeries(&store, &names).await.unwrap(), 2);
        assert_eq!(seed_bakeries(&store, &names).await.unwrap(), 0);
        assert_eq!(store.list_bakeries().await.unwrap().len(), 2);
    }
}
