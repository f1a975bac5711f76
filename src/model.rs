//! Bakery and baked good records as stored and as serialized to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A priced product owned by one bakery. Serialized without the owning bakery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BakedGood {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub bakery_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Bakery {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Owned goods in id order. Filled by the store after the row is read.
    #[sqlx(skip)]
    pub baked_goods: Vec<BakedGood>,
}

/// Validated input for inserting a baked good.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBakedGood {
    pub name: String,
    pub price: f64,
    pub bakery_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bakery_serializes_nested_goods_without_back_reference() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let bakery = Bakery {
            id: 1,
            name: "Sweet Tooth".into(),
            created_at: at,
            baked_goods: vec![BakedGood {
                id: 3,
                name: "Croissant".into(),
                price: 3.5,
                bakery_id: 1,
                created_at: at,
            }],
        };
        let v = serde_json::to_value(&bakery).unwrap();
        let obj = v.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["baked_goods", "created_at", "id", "name"]);

        let good = v["baked_goods"][0].as_object().unwrap();
        let mut keys: Vec<&str> = good.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["bakery_id", "created_at", "id", "name", "price"]);
        assert_eq!(good["price"], serde_json::json!(3.5));
        assert_eq!(good["created_at"], serde_json::json!("2024-05-01T09:30:00Z"));
    }
}
