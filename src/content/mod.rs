//! QR content types and payload formatting
//!
//! A dynamic QR code stores one `destination_content` string whose shape
//! depends on its [`ContentType`]. Structured form input is turned into that
//! string by [`ContentInput::stored_content`].

mod format;

pub use format::{
    ContactCard, ContentInput, EmailMessage, WifiNetwork, format_contact, format_email,
    format_phone, format_wifi, has_http_scheme, normalize_destination,
};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 内容类型（封闭集合）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentType {
    Url,
    Text,
    Email,
    Phone,
    Wifi,
    /// vCard 3.0 联系人，旧数据中写作 `vcard`
    #[serde(alias = "vcard")]
    #[strum(to_string = "contact", serialize = "vcard")]
    Contact,
}

impl ContentType {
    /// 只有 url 类型会触发跳转，其余类型直接展示内容
    pub fn is_redirectable(self) -> bool {
        matches!(self, ContentType::Url)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parse_all_types() {
        for ty in ContentType::iter() {
            assert_eq!(ContentType::from_str(ty.as_ref()).unwrap(), ty);
        }
    }

    #[test]
    fn test_vcard_alias() {
        assert_eq!(ContentType::from_str("vcard").unwrap(), ContentType::Contact);
        assert_eq!(ContentType::Contact.to_string(), "contact");

        let parsed: ContentType = serde_json::from_str("\"vcard\"").unwrap();
        assert_eq!(parsed, ContentType::Contact);
        assert_eq!(
            serde_json::to_string(&ContentType::Contact).unwrap(),
            "\"contact\""
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(ContentType::from_str("sms").is_err());
        assert!(serde_json::from_str::<ContentType>("\"sms\"").is_err());
    }

    #[test]
    fn test_only_url_redirects() {
        let redirectable: Vec<_> = ContentType::iter()
            .filter(|t| t.is_redirectable())
            .collect();
        assert_eq!(redirectable, vec![ContentType::Url]);
    }
}
