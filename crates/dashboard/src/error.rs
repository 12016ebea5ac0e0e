//! Dashboard error type

use therm_shared::ThermError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, Clone)]
pub enum DashboardError {
    #[error("Request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Request to {url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u32 },

    #[error("Invalid state: {0}")]
    InvalidState(#[from] ThermError),

    #[error("Grid size changed from {expected:?} to {actual:?}; reload the page")]
    DimensionsChanged {
        expected: (u16, u16),
        actual: (u16, u16),
    },

    #[error("DOM error: {message}")]
    Dom { message: String },

    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn dom(message: impl Into<String>) -> Self {
        DashboardError::Dom {
            message: message.into(),
        }
    }
}

impl From<JsValue> for DashboardError {
    fn from(err: JsValue) -> Self {
        DashboardError::JsInterop {
            message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::InvalidState(err.into())
    }
}

impl From<DashboardError> for JsValue {
    fn from(err: DashboardError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DashboardError::Http {
            url: "/state".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "Request to /state returned HTTP 503");

        let err = DashboardError::DimensionsChanged {
            expected: (4, 3),
            actual: (5, 3),
        };
        assert!(err.to_string().contains("(5, 3)"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<therm_shared::ServerState>("{").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(
            err,
            DashboardError::InvalidState(ThermError::Parse { .. })
        ));
    }
}
