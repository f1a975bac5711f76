//! Baked good handlers: price listing, most expensive, create, delete.

use crate::error::{AppError, Entity};
use crate::extractors::FormFields;
use crate::handlers::parse_id;
use crate::response::{success_created, success_many, success_message, success_ok};
use crate::service::{CreateBakedGoodForm, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, State};

/// GET /baked_goods/by_price
pub async fn by_price(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let goods = state.store.list_baked_goods_by_price_desc().await?;
    Ok(success_many(goods))
}

/// GET /baked_goods/most_expensive. 404 when there are no baked goods.
pub async fn most_expensive(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let good = state
        .store
        .most_expensive_baked_good()
        .await?
        .ok_or(AppError::NotFound(Entity::BakedGood))?;
    Ok(success_ok(good))
}

/// POST /baked_goods with form fields `name`, `price`, `bakery_id`.
pub async fn create(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let form = CreateBakedGoodForm::from(fields);
    let new = RequestValidator::new_baked_good(&form)?;
    let good = state.store.create_baked_good(&new).await.map_err(|e| match e {
        AppError::Db(err) => {
            tracing::warn!(error = %err, "insert rejected");
            AppError::CreateRejected
        }
        other => other,
    })?;
    Ok(success_created(good))
}

/// DELETE /baked_goods/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str, Entity::BakedGood)?;
    if !state.store.delete_baked_good(id).await? {
        return Err(AppError::NotFound(Entity::BakedGood));
    }
    Ok(success_message("Baked good successfully deleted"))
}
