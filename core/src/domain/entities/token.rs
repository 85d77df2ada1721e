//! Token entities for signed session tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::principal::Role;
use crate::errors::TokenError;

/// Name of the claim carrying the role names
pub const ROLES_CLAIM: &str = "roles";

/// Scheme reported to clients alongside an issued token
pub const TOKEN_TYPE: &str = "Bearer";

/// Claims structure for the session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity name)
    pub sub: String,

    /// Role names, in the order they were granted
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued at timestamp (seconds since the epoch)
    pub iat: i64,

    /// Expiration timestamp (seconds since the epoch)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `subject` issued at `issued_at` and living for `ttl`
    ///
    /// Fails with [`TokenError::TokenGenerationFailed`] when the expiry falls
    /// outside the representable time range.
    pub fn new(
        subject: impl Into<String>,
        roles: &[Role],
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expiry = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::TokenGenerationFailed)?;

        Ok(Self {
            sub: subject.into(),
            roles: roles.iter().map(|role| role.name().to_string()).collect(),
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
        })
    }

    /// Checks if the claims have expired at `now`.
    ///
    /// The expiration instant itself counts as expired, so a token issued
    /// with a zero lifetime is already expired when it is minted.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Issued-at as a timestamp, if representable
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Expiration as a timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Outcome of inspecting a token against the signing key and the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// Correctly signed and not expired
    Valid(Claims),
    /// Correctly signed but past its expiration
    Expired(Claims),
    /// Not a decodable three-segment token
    Malformed,
    /// Well-formed but signed with a different key or tampered with
    BadSignature,
}

impl TokenStatus {
    /// Whether the token can be used to authenticate
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid(_))
    }

    /// The verified claims, present for valid and expired tokens
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            TokenStatus::Valid(claims) | TokenStatus::Expired(claims) => Some(claims),
            TokenStatus::Malformed | TokenStatus::BadSignature => None,
        }
    }

    /// Converts into the claims of a valid token, or the matching error
    pub fn into_claims(self) -> Result<Claims, TokenError> {
        match self {
            TokenStatus::Valid(claims) => Ok(claims),
            TokenStatus::Expired(_) => Err(TokenError::TokenExpired),
            TokenStatus::Malformed => Err(TokenError::InvalidTokenFormat),
            TokenStatus::BadSignature => Err(TokenError::InvalidSignature),
        }
    }
}

/// Token returned to the client after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact signed token
    pub token: String,

    /// Authorization scheme the token is used with
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl IssuedToken {
    /// Creates a new issued token
    pub fn new(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Vec<Role> {
        vec![Role::new("ROLE_ADMIN"), Role::new("ROLE_USER")]
    }

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = Claims::new("alice", &roles(), now, Duration::minutes(30)).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["ROLE_ADMIN", "ROLE_USER"]);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 30 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_zero_ttl_expired_at_issuance() {
        let now = Utc::now();
        let claims = Claims::new("alice", &[], now, Duration::zero()).unwrap();

        assert!(claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_claims_expiration_boundary() {
        let now = Utc::now();
        let claims = Claims::new("alice", &[], now, Duration::seconds(10)).unwrap();

        assert!(!claims.is_expired_at(now + Duration::seconds(9)));
        assert!(claims.is_expired_at(now + Duration::seconds(10)));
    }

    #[test]
    fn test_claims_timestamps() {
        let issued = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("bob", &[], issued, Duration::hours(1)).unwrap();

        assert_eq!(claims.issued_at(), Some(issued));
        assert_eq!(claims.expires_at(), Some(issued + Duration::hours(1)));
    }

    #[test]
    fn test_claims_wire_names() {
        let issued = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new("bob", &roles(), issued, Duration::hours(1)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "bob");
        assert_eq!(json[ROLES_CLAIM], serde_json::json!(["ROLE_ADMIN", "ROLE_USER"]));
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_003_600);
    }

    #[test]
    fn test_claims_missing_roles_defaults_to_empty() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"carol","iat":1,"exp":2}"#).unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn test_token_status_into_claims() {
        let claims = Claims::new("alice", &[], Utc::now(), Duration::minutes(1)).unwrap();

        assert_eq!(
            TokenStatus::Valid(claims.clone()).into_claims(),
            Ok(claims.clone())
        );
        assert_eq!(
            TokenStatus::Expired(claims.clone()).into_claims(),
            Err(TokenError::TokenExpired)
        );
        assert_eq!(
            TokenStatus::Malformed.into_claims(),
            Err(TokenError::InvalidTokenFormat)
        );
        assert_eq!(
            TokenStatus::BadSignature.into_claims(),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_token_status_claims_access() {
        let claims = Claims::new("alice", &[], Utc::now(), Duration::minutes(1)).unwrap();

        assert!(TokenStatus::Valid(claims.clone()).is_valid());
        assert!(!TokenStatus::Expired(claims.clone()).is_valid());
        assert_eq!(TokenStatus::Expired(claims.clone()).claims(), Some(&claims));
        assert_eq!(TokenStatus::BadSignature.claims(), None);
    }

    #[test]
    fn test_claims_expiry_overflow_is_an_error() {
        let result = Claims::new("alice", &[], DateTime::<Utc>::MAX_UTC, Duration::seconds(1));
        assert_eq!(result, Err(TokenError::TokenGenerationFailed));

        let result = Claims::new("alice", &[], Utc::now(), Duration::seconds(10_000_000_000_000));
        assert_eq!(result, Err(TokenError::TokenGenerationFailed));
    }

    #[test]
    fn test_issued_token_creation() {
        let issued = IssuedToken::new("abc.def.ghi".to_string(), 3600);

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);
    }
}
