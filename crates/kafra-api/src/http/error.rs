//! Application error type mapping to HTTP status codes and the `{ error }` body.
//!
//! User-facing messages are fixed Thai strings. Upstream details are logged,
//! never returned.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kafra_types::llm::LlmError;
use kafra_types::wire::ErrorBody;

pub const MSG_NO_MESSAGES: &str = "กรุณาส่งข้อความอย่างน้อยหนึ่งข้อความค่ะ";
pub const MSG_QUOTA: &str = "ขออภัยค่ะ โควต้าการใช้งาน AI หมดแล้ว กรุณาลองใหม่ภายหลังนะคะ";
pub const MSG_RATE_LIMITED: &str = "มีคำขอมากเกินไปค่ะ กรุณารอสักครู่แล้วลองใหม่นะคะ";
pub const MSG_INTERNAL: &str = "ขออภัยค่ะ เกิดข้อผิดพลาดในการประมวลผล กรุณาลองใหม่อีกครั้งนะคะ";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or empty request.
    Validation(String),
    /// Upstream account has no quota left.
    QuotaExceeded,
    /// Local limiter or upstream rate limit.
    RateLimited,
    /// Everything else; the detail goes to the log only.
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::QuotaExceeded(_) => AppError::QuotaExceeded,
            LlmError::RateLimited { .. } => AppError::RateLimited,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(msg) => msg,
            AppError::QuotaExceeded => MSG_QUOTA.to_string(),
            AppError::RateLimited => MSG_RATE_LIMITED.to_string(),
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Chat request failed");
                MSG_INTERNAL.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        let cases = [
            (LlmError::QuotaExceeded("q".into()), StatusCode::PAYMENT_REQUIRED),
            (
                LlmError::RateLimited {
                    retry_after_ms: Some(100),
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                LlmError::Timeout(std::time::Duration::from_secs(30)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (LlmError::AuthenticationFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (LlmError::EmptyResponse, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_validation_is_bad_request() {
        assert_eq!(
            AppError::Validation(MSG_NO_MESSAGES.into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
