pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::database::models::User;

pub use password::{hash_password, verify_any, verify_password, PasswordError};

/// The two kinds of account that can authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Admin,
    Client,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Admin => "admin",
            PrincipalKind::Client => "client",
        }
    }

    pub fn roles(&self) -> Vec<String> {
        match self {
            PrincipalKind::Admin => vec!["ROLE_ADMIN".to_string()],
            PrincipalKind::Client => vec!["ROLE_CLIENT".to_string()],
        }
    }
}

/// Authenticated caller, taken from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn is_client(&self) -> bool {
        self.kind == PrincipalKind::Client
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.sub,
            kind: claims.kind,
        }
    }
}

/// Resources that belong to a client.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.client_id
    }
}

/// Whether `principal` may act on `resource`: only the owning client can.
pub fn authorize(principal: &Principal, resource: &impl Owned) -> bool {
    principal.is_client() && principal.id == resource.owner_id()
}

const MAX_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(principal: &Principal, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: principal.email.clone(),
            id: principal.id,
            kind: principal.kind,
            roles: principal.kind.roles(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    Expired,
    InvalidToken(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::Expired => write!(f, "Expired JWT token"),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// HS256 token issuer and validator.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
}

impl JwtCodec {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&config.jwt_secret, config.jwt_expiry_hours)
    }

    pub fn generate(&self, principal: &Principal) -> Result<String, JwtError> {
        let claims = Claims::new(principal, self.expiry_hours);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: i64) -> Principal {
        Principal {
            id,
            email: format!("client{}@bilemo.com", id),
            kind: PrincipalKind::Client,
        }
    }

    #[test]
    fn round_trips_principal() {
        let codec = JwtCodec::new("secret", 1).unwrap();
        let token = codec.generate(&client(4)).unwrap();
        let claims = codec.validate(&token).unwrap();
        assert_eq!(claims.roles, vec!["ROLE_CLIENT"]);
        assert_eq!(Principal::from(claims), client(4));
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let codec = JwtCodec::new("secret", 1).unwrap();
        let other = JwtCodec::new("other-secret", 1).unwrap();
        let token = other.generate(&client(1)).unwrap();
        assert!(matches!(codec.validate(&token), Err(JwtError::InvalidToken(_))));

        let mut claims = Claims::new(&client(1), 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let expired = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(matches!(codec.validate(&expired), Err(JwtError::Expired)));

        assert!(matches!(codec.validate("garbage"), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(JwtCodec::new("", 1), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn only_owning_client_is_authorized() {
        let user = User {
            id: 9,
            firstname: "Jean".into(),
            lastname: "Dupont".into(),
            email: "jean@example.com".into(),
            phone: None,
            client_id: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(authorize(&client(7), &user));
        assert!(!authorize(&client(8), &user));

        let admin = Principal {
            id: 7,
            email: "admin1@bilemo.com".into(),
            kind: PrincipalKind::Admin,
        };
        assert!(!authorize(&admin, &user));
    }
}
