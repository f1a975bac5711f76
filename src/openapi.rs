//! OpenAPI document listing the response schemas.

use crate::error::ErrorBody;
use crate::model::{BakedGood, Bakery};
use crate::response::MessageBody;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Bakery API", description = "Bakeries and their baked goods"),
    components(schemas(Bakery, BakedGood, ErrorBody, MessageBody))
)]
pub struct ApiDoc;
