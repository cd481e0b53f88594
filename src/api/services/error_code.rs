//! API 错误码
//!
//! 使用 serde_repr 序列化为数字，按千位分域：
//! - 0: 成功
//! - 1000-1099: 通用错误
//! - 2000-2099: 认证错误
//! - 3000-3099: 动态码错误

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::QrLinkerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    TokenInvalid = 2002,

    // 动态码错误 3000-3099
    QrCodeNotFound = 3000,
    ShortCodeConflict = 3001,
    InvalidContent = 3002,
    DatabaseError = 3005,
}

impl From<&QrLinkerError> for ErrorCode {
    fn from(err: &QrLinkerError) -> Self {
        match err {
            QrLinkerError::Validation(_) => ErrorCode::InvalidContent,
            QrLinkerError::NotFound(_) => ErrorCode::QrCodeNotFound,
            QrLinkerError::Conflict(_) => ErrorCode::ShortCodeConflict,
            QrLinkerError::Unauthorized(_) => ErrorCode::TokenInvalid,
            QrLinkerError::Serialization(_) => ErrorCode::BadRequest,
            QrLinkerError::DatabaseConnection(_) | QrLinkerError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
            QrLinkerError::Config(_)
            | QrLinkerError::DatabaseConfig(_)
            | QrLinkerError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::QrCodeNotFound).unwrap(), "3000");
        let code: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&QrLinkerError::not_found("x")),
            ErrorCode::QrCodeNotFound
        );
        assert_eq!(
            ErrorCode::from(&QrLinkerError::database_operation("x")),
            ErrorCode::DatabaseError
        );
    }
}
