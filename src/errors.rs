use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum QrLinkerError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
}

impl QrLinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            QrLinkerError::Config(_) => "E001",
            QrLinkerError::DatabaseConfig(_) => "E002",
            QrLinkerError::DatabaseConnection(_) => "E003",
            QrLinkerError::DatabaseOperation(_) => "E004",
            QrLinkerError::FileOperation(_) => "E005",
            QrLinkerError::Validation(_) => "E006",
            QrLinkerError::NotFound(_) => "E007",
            QrLinkerError::Conflict(_) => "E008",
            QrLinkerError::Unauthorized(_) => "E009",
            QrLinkerError::Serialization(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            QrLinkerError::Config(_) => "Configuration Error",
            QrLinkerError::DatabaseConfig(_) => "Database Configuration Error",
            QrLinkerError::DatabaseConnection(_) => "Database Connection Error",
            QrLinkerError::DatabaseOperation(_) => "Database Operation Error",
            QrLinkerError::FileOperation(_) => "File Operation Error",
            QrLinkerError::Validation(_) => "Validation Error",
            QrLinkerError::NotFound(_) => "Resource Not Found",
            QrLinkerError::Conflict(_) => "Resource Conflict",
            QrLinkerError::Unauthorized(_) => "Unauthorized",
            QrLinkerError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            QrLinkerError::Config(msg)
            | QrLinkerError::DatabaseConfig(msg)
            | QrLinkerError::DatabaseConnection(msg)
            | QrLinkerError::DatabaseOperation(msg)
            | QrLinkerError::FileOperation(msg)
            | QrLinkerError::Validation(msg)
            | QrLinkerError::NotFound(msg)
            | QrLinkerError::Conflict(msg)
            | QrLinkerError::Unauthorized(msg)
            | QrLinkerError::Serialization(msg) => msg,
        }
    }

    /// 映射为 HTTP 状态码（API 层使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            QrLinkerError::Validation(_) | QrLinkerError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            QrLinkerError::NotFound(_) => StatusCode::NOT_FOUND,
            QrLinkerError::Conflict(_) => StatusCode::CONFLICT,
            QrLinkerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            QrLinkerError::Config(_)
            | QrLinkerError::DatabaseConfig(_)
            | QrLinkerError::DatabaseConnection(_)
            | QrLinkerError::DatabaseOperation(_)
            | QrLinkerError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for QrLinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QrLinkerError {}

// 便捷的构造函数
impl QrLinkerError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        QrLinkerError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for QrLinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        QrLinkerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for QrLinkerError {
    fn from(err: std::io::Error) -> Self {
        QrLinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for QrLinkerError {
    fn from(err: serde_json::Error) -> Self {
        QrLinkerError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for QrLinkerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        QrLinkerError::Unauthorized(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QrLinkerError>;
