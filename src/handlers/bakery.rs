//! Bakery handlers: list, read, rename.

use crate::error::{AppError, Entity};
use crate::extractors::FormFields;
use crate::handlers::parse_id;
use crate::response::{success_many, success_ok};
use crate::service::{RequestValidator, UpdateBakeryForm};
use crate::state::AppState;
use axum::extract::{Path, State};

/// GET /bakeries
pub async fn list(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    let bakeries = state.store.list_bakeries().await?;
    Ok(success_many(bakeries))
}

/// GET /bakeries/:id
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str, Entity::Bakery)?;
    let bakery = state
        .store
        .get_bakery(id)
        .await?
        .ok_or(AppError::NotFound(Entity::Bakery))?;
    Ok(success_ok(bakery))
}

/// PATCH /bakeries/:id with optional form field `name`. A missing body is an empty form.
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    fields: FormFields,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str, Entity::Bakery)?;
    let form = UpdateBakeryForm::from(fields);
    let bakery = state
        .store
        .update_bakery_name(id, RequestValidator::bakery_name(&form))
        .await?
        .ok_or(AppError::NotFound(Entity::Bakery))?;
    Ok(success_ok(bakery))
}
