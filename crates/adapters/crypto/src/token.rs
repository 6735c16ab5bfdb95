//! Stateless session tokens.
//!
//! A token is `base64url(claims_json) "." base64url(hmac_sha256(claims_json))`.
//! Verification recomputes the MAC in constant time before looking at the
//! claims, then rejects expired ones.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use eodsa_app::ports::SessionTokens;
use eodsa_domain::error::{AuthError, EodsaError};
use eodsa_domain::session::{Claims, Principal};
use eodsa_domain::time::{Timestamp, now};

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct HmacSessionTokens {
    mac: HmacSha256,
    ttl: Duration,
}

impl HmacSessionTokens {
    /// # Errors
    ///
    /// Returns [`CryptoError::SecretTooShort`] below [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Result<Self, CryptoError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(CryptoError::SecretTooShort {
                min: MIN_SECRET_LEN,
            });
        }
        let mac = <HmacSha256 as Mac>::new_from_slice(&secret).map_err(|_| {
            CryptoError::SecretTooShort {
                min: MIN_SECRET_LEN,
            }
        })?;
        Ok(Self { mac, ttl })
    }

    fn issue_at(&self, principal: Principal, at: Timestamp) -> Result<String, EodsaError> {
        let claims = Claims {
            principal,
            expires_at: at + self.ttl,
        };
        let payload = serde_json::to_vec(&claims).map_err(CryptoError::from)?;
        let mut mac = self.mac.clone();
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn verify_at(&self, token: &str, at: Timestamp) -> Result<Principal, EodsaError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
        if claims.expires_at <= at {
            return Err(AuthError::ExpiredToken.into());
        }
        Ok(claims.principal)
    }
}

impl SessionTokens for HmacSessionTokens {
    fn issue(&self, principal: Principal) -> Result<String, EodsaError> {
        self.issue_at(principal, now())
    }

    fn verify(&self, token: &str) -> Result<Principal, EodsaError> {
        self.verify_at(token, now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eodsa_domain::id::{JudgeId, StudioId};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn tokens() -> HmacSessionTokens {
        HmacSessionTokens::new(SECRET, Duration::hours(12)).unwrap()
    }

    #[test]
    fn should_round_trip_principal() {
        let principal = Principal::Judge {
            id: JudgeId::new(),
            admin: true,
        };
        let token = tokens().issue(principal).unwrap();
        assert_eq!(tokens().verify(&token).unwrap(), principal);
    }

    #[test]
    fn should_reject_tampered_payload() {
        let tokens = tokens();
        let studio = tokens
            .issue(Principal::Studio { id: StudioId::new() })
            .unwrap();
        let admin = tokens
            .issue(Principal::Judge {
                id: JudgeId::new(),
                admin: true,
            })
            .unwrap();
        let forged = format!(
            "{}.{}",
            admin.split_once('.').unwrap().0,
            studio.split_once('.').unwrap().1
        );

        assert!(matches!(
            tokens.verify(&forged),
            Err(EodsaError::Unauthorized(AuthError::InvalidToken))
        ));
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(EodsaError::Unauthorized(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let other =
            HmacSessionTokens::new(b"ffffffffffffffffffffffffffffffff".to_vec(), Duration::hours(1))
                .unwrap();
        let token = other
            .issue(Principal::Studio { id: StudioId::new() })
            .unwrap();
        assert!(tokens().verify(&token).is_err());
    }

    #[test]
    fn should_expire_after_ttl() {
        let tokens = tokens();
        let issued_at = now();
        let token = tokens
            .issue_at(Principal::Studio { id: StudioId::new() }, issued_at)
            .unwrap();

        assert!(tokens.verify_at(&token, issued_at + Duration::hours(11)).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, issued_at + Duration::hours(12)),
            Err(EodsaError::Unauthorized(AuthError::ExpiredToken))
        ));
    }

    #[test]
    fn should_refuse_short_secret() {
        assert!(matches!(
            HmacSessionTokens::new(b"short".to_vec(), Duration::hours(1)),
            Err(CryptoError::SecretTooShort { min: 32 })
        ));
    }
}
