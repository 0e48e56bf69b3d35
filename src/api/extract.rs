use crate::types::AppError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// `axum::Json` whose rejections render as a 400 [`AppError`] body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Reject identifiers that are not UUIDs before they reach the store.
pub fn parse_id(id: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4().to_string();
        assert_eq!(parse_id(&id).expect("valid uuid"), id);
        assert!(matches!(parse_id("123"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_id(""), Err(AppError::InvalidInput(_))));
    }
}
