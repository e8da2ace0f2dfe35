use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Non-2xx answer from the analytics API. Kept intact so callers can downcast and react to the
/// status (for example pass a 404 through).
#[derive(Debug, Clone)]
pub struct ApiStatusError {
    pub endpoint: &'static str,
    pub status: StatusCode,
    pub detail: Option<String>,
    pub raw_body: String,
}

impl ApiStatusError {
    pub fn new(endpoint: &'static str, status: StatusCode, raw_body: String) -> Self {
        // The backend reports failures as {"detail": "..."}.
        let detail = serde_json::from_str::<Value>(&raw_body)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string));
        Self {
            endpoint,
            status,
            detail,
            raw_body,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(
                f,
                "analytics API error (endpoint={}, status={}): {}",
                self.endpoint, self.status, detail
            ),
            None => write!(
                f,
                "analytics API error (endpoint={}, status={})",
                self.endpoint, self.status
            ),
        }
    }
}

impl std::error::Error for ApiStatusError {}

/// Rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParams(pub String);

impl fmt::Display for InvalidParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid parameters: {}", self.0)
    }
}

impl std::error::Error for InvalidParams {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backend_detail() {
        let err = ApiStatusError::new(
            "industry_trend",
            StatusCode::NOT_FOUND,
            r#"{"detail": "no trend data for Coal"}"#.to_string(),
        );
        assert!(err.is_not_found());
        assert_eq!(err.detail.as_deref(), Some("no trend data for Coal"));
        assert!(err.to_string().contains("no trend data for Coal"));
    }

    #[test]
    fn tolerates_non_json_body() {
        let err = ApiStatusError::new(
            "stock_hierarchy",
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>".to_string(),
        );
        assert!(err.detail.is_none());
        assert_eq!(
            err.to_string(),
            "analytics API error (endpoint=stock_hierarchy, status=502 Bad Gateway)"
        );
    }
}
