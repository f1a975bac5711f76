//! HTTP handlers for bakeries and baked goods.

pub mod baked_good;
pub mod bakery;

use crate::error::{AppError, Entity};

/// Path ids must be integers; anything else cannot name a row, so it is reported as not found.
pub(crate) fn parse_id(id_str: &str, entity: Entity) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::NotFound(entity))
}
