use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::error::ApiError;

pub const UNEXPECTED_FIELD: &str = "This field was not expected.";
pub const NOT_BLANK: &str = "This value should not be blank.";

/// Field-path -> messages, as carried by validation failures
pub type Violations = HashMap<String, Vec<String>>;

/// A typed request form with a static field allow-list.
///
/// `fields()` names every assignable field; `set_field` performs the typed
/// assignment for one of them and reports a message on type mismatch.
/// `validate` runs the form's own constraints once all fields are assigned.
pub trait FormType {
    fn fields() -> &'static [&'static str];

    fn set_field(&mut self, name: &str, value: &Value) -> Result<(), String>;

    fn validate(&self) -> Violations {
        Violations::new()
    }

    fn allow_extra_fields() -> bool {
        false
    }
}

/// Parse a raw request body into params. An unparsable body is treated as
/// empty params, not an error; binding then sees an empty form.
pub fn parse_params(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| json!({}))
}

/// Assign the `form` object of `params` onto `form` and validate.
///
/// Unknown fields (with extra fields disallowed) fail binding before the
/// form's own validation runs, each reported under its own name. Otherwise
/// assignment errors and `FormType::validate` violations are combined.
pub fn bind<T: FormType>(
    form: &mut T,
    params: &Value,
    allow_extra_fields: bool,
) -> Result<(), ApiError> {
    let empty = serde_json::Map::new();
    let form_params = params
        .get("form")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut unknown = Violations::new();
    let mut violations = Violations::new();

    for (name, value) in form_params {
        if T::fields().contains(&name.as_str()) {
            if let Err(message) = form.set_field(name, value) {
                violations.entry(name.clone()).or_default().push(message);
            }
        } else if !allow_extra_fields {
            unknown
                .entry(name.clone())
                .or_default()
                .push(UNEXPECTED_FIELD.to_string());
        }
    }

    // Unknown fields preempt per-type validation
    if !unknown.is_empty() {
        return Err(ApiError::validation_params(unknown));
    }

    for (field, messages) in form.validate() {
        violations.entry(field).or_default().extend(messages);
    }

    if !violations.is_empty() {
        return Err(ApiError::validation_params(violations));
    }

    Ok(())
}

/// Extractor that reads the request body, binds it onto `T`, and validates
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: FormType + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        let params = parse_params(std::str::from_utf8(&bytes).unwrap_or(""));

        let mut form = T::default();
        bind(&mut form, &params, T::allow_extra_fields())?;
        Ok(Self(form))
    }
}
