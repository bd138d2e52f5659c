//! JWT token management
//!
//! Provides JWT token generation and validation

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};

use crate::auth::types::{AuthContext, JwtClaims};
use crate::config::AuthConfig;
use crate::error::{AppError, Result};

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: AuthConfig,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create new JWT manager
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 30; // 30 seconds tolerance

        Self {
            encoding_key,
            decoding_key,
            validation,
            config: config.clone(),
        }
    }

    /// Generate access token
    pub fn generate_access_token(
        &self,
        user_id: i32,
        username: String,
        is_staff: bool,
    ) -> Result<String> {
        let claims = JwtClaims::new(
            user_id,
            username,
            is_staff,
            self.config.jwt_expires_in,
            &self.config.issuer,
            &self.config.audience,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal_with_source(format!("Token generation failed: {e}"), e))
    }

    /// Validate and parse token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        let token_data: TokenData<JwtClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth("认证令牌已过期"),
                _ => AppError::auth_with_source(format!("Token validation failed: {e}"), e),
            })?;

        let claims = token_data.claims;
        if claims.is_expired() {
            return Err(AppError::auth("认证令牌已过期"));
        }

        Ok(claims)
    }

    /// 校验令牌并转换为调用者上下文
    pub fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.validate_token(token)?;
        let user_id = claims
            .user_id()
            .map_err(|e| AppError::auth_with_source("令牌中的用户ID无效", e))?;

        Ok(AuthContext {
            user_id,
            username: claims.username,
            is_staff: claims.is_staff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        JwtManager::new(&AuthConfig {
            jwt_secret: "test-secret-key".to_string(),
            jwt_expires_in: 3600,
            issuer: "market-ai".to_string(),
            audience: "market-ai-api".to_string(),
        })
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = create_test_manager();
        let token = manager
            .generate_access_token(42, "seller".to_string(), false)
            .unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "seller");
        assert!(!claims.is_staff);
        assert_eq!(claims.iss, "market-ai");

        let context = manager.authenticate(&token).unwrap();
        assert_eq!(
            context,
            AuthContext {
                user_id: 42,
                username: "seller".to_string(),
                is_staff: false,
            }
        );
    }

    #[test]
    fn test_invalid_token() {
        let manager = create_test_manager();
        let err = manager.validate_token("not.a.token").unwrap_err();
        assert!(matches!(err, AppError::Auth { .. }));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = JwtManager::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..AuthConfig::default()
        });
        let token = other
            .generate_access_token(1, "staff".to_string(), true)
            .unwrap();

        assert!(create_test_manager().authenticate(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = JwtManager::new(&AuthConfig {
            jwt_secret: "test-secret-key".to_string(),
            jwt_expires_in: -120,
            issuer: "market-ai".to_string(),
            audience: "market-ai-api".to_string(),
        });
        let token = manager
            .generate_access_token(1, "late".to_string(), false)
            .unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert!(err.to_string().contains("过期"));
    }
}
