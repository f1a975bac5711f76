//! Form fields from urlencoded or multipart bodies. A repeated key keeps its first value.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
    response::{IntoResponse, Response},
    Form,
};
use std::collections::HashMap;

/// Text fields of a request body. Bodies that are neither urlencoded nor multipart
/// yield no fields; their bytes are still read so the size limit applies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    fn insert_first(&mut self, key: String, value: String) {
        self.0.entry(key).or_insert(value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FormFields::default();
        for (k, v) in iter {
            fields.insert_first(k.into(), v.into());
        }
        fields
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let mut fields = FormFields::default();
            while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
                let Some(name) = field.name().map(String::from) else {
                    continue;
                };
                // File parts are not form values.
                if field.file_name().is_some() {
                    continue;
                }
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                fields.insert_first(name, value);
            }
            return Ok(fields);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(pairs.into_iter().collect());
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if !body.is_empty() {
            tracing::debug!(content_type = %content_type, len = body.len(), "ignoring non-form body");
        }
        Ok(FormFields::default())
    }
}
