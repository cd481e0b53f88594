//! 会话令牌校验
//!
//! 令牌由外部认证服务签发（HS256），`sub` 即 owner id。
//! `issue` 只供本地开发 (`qrlinker token`) 与测试使用。

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;
use crate::errors::{QrLinkerError, Result};
use crate::utils::generate_random_code;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub jti: String,
}

/// 已认证的所有者，由认证中间件放入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    pub owner_id: String,
}

pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: Option<String>,
    token_minutes: u64,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: Option<String>, token_minutes: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(QrLinkerError::config("auth.jwt_secret is empty"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.filter(|a| !a.is_empty()),
            token_minutes,
        })
    }

    /// 服务端使用：未配置密钥时生成随机密钥，此时外部令牌全部无效
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let secret = if config.jwt_secret.is_empty() {
            warn!("auth.jwt_secret not configured, generating a random secret; owner API will reject every token");
            generate_random_code(48)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(&secret, config.audience.clone(), config.token_minutes)
    }

    pub fn issue(&self, owner_id: &str) -> Result<String> {
        self.issue_with_ttl(owner_id, self.token_minutes)
    }

    pub fn issue_with_ttl(&self, owner_id: &str, minutes: u64) -> Result<String> {
        if owner_id.trim().is_empty() {
            return Err(QrLinkerError::validation("owner id is required"));
        }

        let now = Utc::now();
        let claims = SessionClaims {
            sub: owner_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(minutes as i64)).timestamp(),
            aud: self.audience.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<OwnerIdentity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(QrLinkerError::unauthorized("token has empty subject"));
        }

        Ok(OwnerIdentity {
            owner_id: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SessionVerifier {
        SessionVerifier::new("test_secret_key_32_bytes_long!!", None, 15).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let v = verifier();
        let token = v.issue("user-42").unwrap();
        assert_eq!(v.verify(&token).unwrap().owner_id, "user-42");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = verifier().issue("user-42").unwrap();
        let other = SessionVerifier::new("another_secret_entirely_here!!", None, 15).unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(QrLinkerError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verifier().verify("not.a.token").is_err());
        assert!(verifier().verify("").is_err());
    }

    #[test]
    fn test_audience_checked() {
        let app = SessionVerifier::new("secret-secret-secret", Some("qr-app".into()), 15).unwrap();
        let other = SessionVerifier::new("secret-secret-secret", Some("billing".into()), 15).unwrap();

        let token = app.issue("user-1").unwrap();
        assert!(app.verify(&token).is_ok());
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        assert!(matches!(
            SessionVerifier::new("", None, 15),
            Err(QrLinkerError::Config(_))
        ));
        // 服务端兜底生成随机密钥
        assert!(SessionVerifier::from_config(&AuthConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_owner_rejected() {
        assert!(verifier().issue(" ").is_err());
    }
}
