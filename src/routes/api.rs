//! Bakery and baked good routes.
//! `/baked_goods/by_price` and `/baked_goods/most_expensive` are static segments, so they win over `/:id`.

use crate::handlers::{baked_good, bakery};
use crate::state::AppState;
use axum::{routing::delete, routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/bakeries", get(bakery::list))
        .route("/bakeries/:id", get(bakery::read).patch(bakery::update))
        .route("/baked_goods", post(baked_good::create))
        .route("/baked_goods/by_price", get(baked_good::by_price))
        .route("/baked_goods/most_expensive", get(baked_good::most_expensive))
        .route("/baked_goods/:id", delete(baked_good::delete))
        .with_state(state)
}
