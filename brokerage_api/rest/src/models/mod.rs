use std::collections::BTreeMap;

use serde::Serialize;

pub mod blog;
pub mod submission;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<&'static str, &'static str>>,
    /// Underlying cause, only set in non-production deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: false,
            message,
            errors: None,
            error: None,
        }
    }
}
