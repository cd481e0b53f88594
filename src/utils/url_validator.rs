//! 跳转地址校验
//!
//! 只接受 http / https，阻止可执行脚本的协议

use url::Url;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "unsupported protocol {}, only http and https are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "protocol {} is not allowed", proto),
            Self::InvalidFormat(msg) => write!(f, "invalid URL: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 返回命中的危险协议前缀
pub fn dangerous_protocol(url: &str) -> Option<&'static str> {
    let lower = url.trim_start().to_ascii_lowercase();
    DANGEROUS_PROTOCOLS
        .iter()
        .copied()
        .find(|proto| lower.starts_with(proto))
}

/// 校验一个绝对 http(s) 地址
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if let Some(proto) = dangerous_protocol(url) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("HTTPS://Example.com").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_blocks_dangerous_protocols() {
        for url in [
            "javascript:alert(1)",
            "JavaScript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "file:///etc/passwd",
            "vbscript:msgbox(1)",
            "about:blank",
            "blob:https://example.com/uuid",
        ] {
            assert!(
                matches!(validate_url(url), Err(UrlValidationError::DangerousProtocol(_))),
                "{url} should be blocked"
            );
        }
    }

    #[test]
    fn test_rejects_other_protocols() {
        assert_eq!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol("ftp:".into()))
        );
        assert!(matches!(
            validate_url("mailto:test@example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert_eq!(validate_url("  "), Err(UrlValidationError::EmptyUrl));
        assert!(matches!(
            validate_url("https://not a url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }
}
