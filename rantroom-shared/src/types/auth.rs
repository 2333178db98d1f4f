use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a gateway-issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: Option<String>, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            iat: now,
            exp: now + duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// The per-request identity resolved from a bearer token.
///
/// Carries the raw access token so gateway writes are scoped to the
/// session that issued them.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl AuthUser {
    pub fn from_claims(claims: Claims, access_token: String) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            access_token,
        }
    }
}

/// A session as issued by the gateway's token endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: GatewayUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(Uuid::new_v4(), None, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn past_expiry_is_detected() {
        let mut claims = Claims::new(Uuid::new_v4(), None, 3600);
        claims.exp = Utc::now().timestamp() - 10;
        assert!(claims.is_expired());
    }

    #[test]
    fn claims_tolerate_extra_token_fields() {
        let id = Uuid::new_v4();
        let raw = serde_json::json!({
            "sub": id,
            "email": "someone@example.com",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "role": "authenticated",
            "aud": "authenticated"
        });
        let claims: Claims = serde_json::from_value(raw).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email.as_deref(), Some("someone@example.com"));
    }
}
