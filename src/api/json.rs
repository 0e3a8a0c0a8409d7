use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, FieldErrors};

/// Request bodies that check their own fields after deserializing.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// `Json<T>` whose failures come back as 422 `ApiError`s instead of plain
/// text, and whose payload has passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|field_errors| ApiError::unprocessable_entity("Unprocessable Entity", field_errors))?;

        Ok(ValidJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Expected request with `Content-Type: application/json`")
        }
        JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Request body is not valid JSON"),
        JsonRejection::JsonDataError(e) => ApiError::invalid_field("_schema", e.body_text()),
        other => ApiError::bad_request(other.body_text()),
    }
}

/// Accumulates field problems while validating a payload.
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_text(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            None => self.fail(field, "Missing data for required field."),
            Some(v) if v.trim().is_empty() => self.fail(field, "Field may not be empty."),
            Some(_) => self,
        }
    }

    pub fn non_empty_if_present(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if v.trim().is_empty() => self.fail(field, "Field may not be empty."),
            _ => self,
        }
    }

    pub fn require<T>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.fail(field, "Missing data for required field.");
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        match value {
            Some(v) if !v.is_finite() || v < 0.0 => self.fail(field, "Must be a non-negative number."),
            _ => self,
        }
    }

    pub fn fail(&mut self, field: &str, problem: &str) -> &mut Self {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| problem.to_string());
        self
    }

    pub fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
