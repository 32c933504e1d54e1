//! Response envelope shared by every endpoint.

use std::borrow::Cow;

use serde::Serialize;

use crate::error::ApiError;
use crate::pagination::PageInfo;

/// JSON body wrapper: `{"code", "status", "message", "data", "errors", "pagination"}`.
///
/// The HTTP status is carried alongside but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> Envelope<T> {
    /// Successful response. Statuses outside `200..300` are normalised to 200.
    pub fn success(data: T, http_status: Option<u16>) -> Self {
        let http_status = match http_status {
            Some(s) if (200..300).contains(&s) => s,
            _ => 200,
        };
        Self {
            http_status,
            code: None,
            status: Some("success"),
            message: None,
            data: Some(data),
            errors: Vec::new(),
            pagination: None,
        }
    }

    /// Failed response built from a catalog record.
    pub fn failed(err: &ApiError) -> Self {
        let http_status = if err.http_status == 0 { 500 } else { err.http_status };
        Self {
            http_status,
            code: Some(err.code),
            status: Some("failed"),
            message: Some(err.message.clone()),
            data: None,
            errors: Vec::new(),
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_pagination(mut self, pagination: PageInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_normalises_out_of_range_status() {
        assert_eq!(Envelope::success(1, Some(404)).http_status, 200);
        assert_eq!(Envelope::success(1, Some(199)).http_status, 200);
        assert_eq!(Envelope::success(1, Some(201)).http_status, 201);
        assert_eq!(Envelope::success(1, None).http_status, 200);
    }

    #[test]
    fn failed_carries_catalog_record() {
        let env: Envelope<()> = Envelope::failed(&ApiError::FORBIDDEN);
        assert_eq!(env.http_status, 403);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "code": 4030001,
                "status": "failed",
                "message": "You do not have permission to access this resource",
            })
        );
    }

    #[test]
    fn failed_with_zero_status_falls_back_to_500() {
        let err = ApiError::new(0, 1, "odd");
        let env: Envelope<()> = Envelope::failed(&err);
        assert_eq!(env.http_status, 500);
    }

    #[test]
    fn validation_failure_lists_field_errors() {
        let env: Envelope<()> = Envelope::failed(&ApiError::validation("Validation failed"))
            .with_errors(vec!["email is required".to_string(), "page must be positive".to_string()]);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(env.http_status, 400);
        assert_eq!(v["code"], 4002999);
        assert_eq!(v["errors"], json!(["email is required", "page must be positive"]));
    }

    #[test]
    fn success_message_is_serialized() {
        let env = Envelope::success(json!({"id": 1}), Some(201)).with_message("created");
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["message"], "created");
        assert!(v.get("errors").is_none());
    }

    #[test]
    fn success_serializes_data_and_pagination() {
        let env = Envelope::success(vec!["a"], None).with_pagination(PageInfo {
            next: Some(2),
            prev: None,
            total: 11,
            page: 1,
        });
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["data"], json!(["a"]));
        assert_eq!(v["pagination"]["next"], 2);
        assert_eq!(v["pagination"]["total"], 11);
    }
}
