use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::ContentType;
use crate::errors::{QrLinkerError, Result};
use crate::utils::url_validator::{dangerous_protocol, validate_url};

/// 结构化内容输入（创建 / 编辑动态码时提交）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentInput {
    Url {
        url: String,
    },
    Text {
        text: String,
    },
    Email(EmailMessage),
    Phone {
        number: String,
    },
    Wifi(WifiNetwork),
    #[serde(alias = "vcard")]
    Contact(ContactCard),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub address: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    /// WPA / WEP / nopass，为空时按 WPA 处理
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
}

impl ContentInput {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentInput::Url { .. } => ContentType::Url,
            ContentInput::Text { .. } => ContentType::Text,
            ContentInput::Email(_) => ContentType::Email,
            ContentInput::Phone { .. } => ContentType::Phone,
            ContentInput::Wifi(_) => ContentType::Wifi,
            ContentInput::Contact(_) => ContentType::Contact,
        }
    }

    /// 写入 `destination_content` 的值
    ///
    /// url 去掉首尾空白后保存，不做补全；保存值与 `validate` 校验的值一致。
    pub fn stored_content(&self) -> String {
        match self {
            ContentInput::Url { url } => url.trim().to_string(),
            ContentInput::Text { text } => text.clone(),
            ContentInput::Email(msg) => format_email(msg),
            ContentInput::Phone { number } => format_phone(number),
            ContentInput::Wifi(network) => format_wifi(network),
            ContentInput::Contact(card) => format_contact(card),
        }
    }

    /// 编码进二维码的内容（url 补全 https:// 前缀）
    pub fn qr_payload(&self) -> String {
        match self {
            ContentInput::Url { url } => normalize_destination(url.trim()).into_owned(),
            _ => self.stored_content(),
        }
    }

    /// 提交前的字段校验
    pub fn validate(&self) -> Result<()> {
        match self {
            ContentInput::Url { url } => {
                let raw = url.trim();
                if raw.is_empty() {
                    return Err(QrLinkerError::validation("Content is required"));
                }
                // 补全前先拦截危险协议，否则会被拼成 https://javascript:...
                if let Some(proto) = dangerous_protocol(raw) {
                    return Err(QrLinkerError::validation(format!(
                        "Protocol {} is not allowed",
                        proto
                    )));
                }
                validate_url(&normalize_destination(raw)).map_err(|e| {
                    QrLinkerError::validation(format!("Please enter a valid URL: {}", e))
                })
            }
            ContentInput::Text { text } if text.trim().is_empty() => {
                Err(QrLinkerError::validation("Content is required"))
            }
            ContentInput::Email(msg) if msg.address.trim().is_empty() => {
                Err(QrLinkerError::validation("Email address is required"))
            }
            ContentInput::Phone { number } if number.trim().is_empty() => {
                Err(QrLinkerError::validation("Phone number is required"))
            }
            ContentInput::Wifi(network) if network.ssid.is_empty() => {
                Err(QrLinkerError::validation("Network name (SSID) is required"))
            }
            ContentInput::Contact(card)
                if card.name.trim().is_empty()
                    && card.phone.trim().is_empty()
                    && card.email.trim().is_empty() =>
            {
                Err(QrLinkerError::validation(
                    "Contact needs at least a name, phone or email",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// 是否已带有 http:// 或 https:// 前缀（不区分大小写）
pub fn has_http_scheme(url: &str) -> bool {
    let bytes = url.as_bytes();
    let starts_with = |prefix: &str| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    };
    starts_with("http://") || starts_with("https://")
}

/// 补全跳转地址：缺少协议时加上 `https://`
///
/// 只用于跳转 / 二维码编码，存储值保持用户输入原样。
pub fn normalize_destination(url: &str) -> Cow<'_, str> {
    if has_http_scheme(url) {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("https://{}", url))
    }
}

/// `mailto:<address>[?subject=..][&body=..]`
pub fn format_email(msg: &EmailMessage) -> String {
    let mut out = format!("mailto:{}", msg.address);
    let mut separator = '?';

    let params = [("subject", &msg.subject), ("body", &msg.body)];
    for (key, value) in params {
        // 空字符串视为未填写
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            out.push(separator);
            out.push_str(key);
            out.push('=');
            out.push_str(&encode_component(value));
            separator = '&';
        }
    }

    out
}

/// 与浏览器 `encodeURIComponent` 一致：`!'()*` 不转义
fn encode_component(value: &str) -> String {
    const KEPT: [(&str, &str); 5] = [
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%2A", "*"),
    ];
    // encode 只会为这些字符本身生成对应序列，原文中的 `%` 已变为 `%25`
    KEPT.iter()
        .fold(urlencoding::encode(value).into_owned(), |acc, (escaped, raw)| {
            acc.replace(escaped, raw)
        })
}

pub fn format_phone(number: &str) -> String {
    format!("tel:{}", number)
}

/// `WIFI:T:<security>;S:<ssid>;P:<password>;H:<hidden>;;`
pub fn format_wifi(network: &WifiNetwork) -> String {
    let security = network
        .security
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("WPA");

    format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        security, network.ssid, network.password, network.hidden
    )
}

/// vCard 3.0，字段固定，空字段保留空值
pub fn format_contact(card: &ContactCard) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", card.name),
        format!("ORG:{}", card.organization),
        format!("TEL:{}", card.phone),
        format!("EMAIL:{}", card.email),
        format!("URL:{}", card.website),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}
