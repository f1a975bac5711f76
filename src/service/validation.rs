//! Form validation: presence checks and numeric coercion before anything reaches the store.

use crate::error::AppError;
use crate::extractors::FormFields;
use crate::model::NewBakedGood;

/// Raw form fields for `POST /baked_goods`. Every field is optional so absence is reported
/// as a validation error rather than a rejected extractor.
#[derive(Clone, Debug, Default)]
pub struct CreateBakedGoodForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub bakery_id: Option<String>,
}

impl From<FormFields> for CreateBakedGoodForm {
    fn from(mut fields: FormFields) -> Self {
        CreateBakedGoodForm {
            name: fields.take("name"),
            price: fields.take("price"),
            bakery_id: fields.take("bakery_id"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateBakeryForm {
    pub name: Option<String>,
}

impl From<FormFields> for UpdateBakeryForm {
    fn from(mut fields: FormFields) -> Self {
        UpdateBakeryForm {
            name: fields.take("name"),
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// All three fields must be present and non-empty; then `price` must be a finite number
    /// and `bakery_id` an integer.
    pub fn new_baked_good(form: &CreateBakedGoodForm) -> Result<NewBakedGood, AppError> {
        let name = required("name", form.name.as_deref())?;
        let price = required("price", form.price.as_deref())?;
        let bakery_id = required("bakery_id", form.bakery_id.as_deref())?;

        let price: f64 = price.trim().parse().map_err(|_| AppError::InvalidField {
            field: "price",
            reason: format!("'{}' is not a number", price),
        })?;
        if !price.is_finite() {
            return Err(AppError::InvalidField {
                field: "price",
                reason: "must be a finite number".into(),
            });
        }
        let bakery_id: i64 = bakery_id.trim().parse().map_err(|_| AppError::InvalidField {
            field: "bakery_id",
            reason: format!("'{}' is not an integer", bakery_id),
        })?;

        Ok(NewBakedGood {
            name: name.to_string(),
            price,
            bakery_id,
        })
    }

    /// New bakery name, or None when the field is absent or empty.
    pub fn bakery_name(form: &UpdateBakeryForm) -> Option<&str> {
        form.name.as_deref().filter(|n| !n.is_empty())
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::MissingData { field }),
    }
}
