//! 配置值验证模块
//!
//! 启动时对静态配置做一次合法性检查。

use super::structs::StaticConfig;
use crate::errors::{QrLinkerError, Result};

/// 短码长度允许范围
pub const SHORT_CODE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=32;

/// 跳转倒计时上限（秒）
pub const MAX_COUNTDOWN_SECONDS: u32 = 60;

pub fn validate_static_config(config: &StaticConfig) -> Result<()> {
    if !SHORT_CODE_LENGTH_RANGE.contains(&config.redirect.short_code_length) {
        return Err(QrLinkerError::config(format!(
            "redirect.short_code_length must be within {}..={}, got {}",
            SHORT_CODE_LENGTH_RANGE.start(),
            SHORT_CODE_LENGTH_RANGE.end(),
            config.redirect.short_code_length
        )));
    }

    if config.redirect.countdown_seconds > MAX_COUNTDOWN_SECONDS {
        return Err(QrLinkerError::config(format!(
            "redirect.countdown_seconds must be at most {}, got {}",
            MAX_COUNTDOWN_SECONDS, config.redirect.countdown_seconds
        )));
    }

    if let Some(ref base) = config.server.public_base_url {
        let parsed = url::Url::parse(base).map_err(|e| {
            QrLinkerError::config(format!("server.public_base_url is invalid: {}", e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(QrLinkerError::config(format!(
                "server.public_base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
    }

    if !matches!(config.logging.format.as_str(), "text" | "json") {
        return Err(QrLinkerError::config(format!(
            "logging.format must be \"text\" or \"json\", got \"{}\"",
            config.logging.format
        )));
    }

    Ok(())
}
