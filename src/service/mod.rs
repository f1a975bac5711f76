//! Request validation between the HTTP extractors and the store.

mod validation;
pub use validation::{CreateBakedGoodForm, RequestValidator, UpdateBakeryForm};
