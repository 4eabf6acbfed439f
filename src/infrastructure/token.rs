use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::ids::UserId;

/// Tokens assert a user id for a fixed window; there is no revocation list,
/// so rotating the secret is the only way to invalidate outstanding tokens.
pub const TOKEN_TTL_DAYS: i64 = 15;

#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i64,
    exp: i64,
}

/// Issues and verifies stateless bearer tokens: a base64url JSON payload of
/// `{id, exp}` followed by an HMAC-SHA256 signature over that payload.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, user_id: UserId) -> String {
        let exp = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
        self.issue_expiring_at(user_id, exp.timestamp())
    }

    fn issue_expiring_at(&self, user_id: UserId, exp: i64) -> String {
        let claims = Claims {
            id: user_id.into_inner(),
            exp,
        };
        // Claims is two plain integers; serialization cannot fail.
        #[allow(clippy::unwrap_used)]
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));
        format!("{payload}.{signature}")
    }

    pub fn verify(&self, token: &str) -> Result<UserId, InvalidToken> {
        let (payload, signature) = token.split_once('.').ok_or(InvalidToken)?;

        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| InvalidToken)?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| InvalidToken)?;

        let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(InvalidToken);
        }

        Ok(UserId::new(claims.id))
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> Hmac<Sha256> {
        #[allow(clippy::expect_used)]
        Hmac::<Sha256>::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }
}
