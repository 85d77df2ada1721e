//! Unit tests for token service

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::principal::{Principal, Role};
use crate::domain::entities::token::{Claims, TokenStatus};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::InMemoryIdentityDirectory;
use crate::services::token::{TokenService, TokenServiceConfig, SIGNING_ALGORITHM};

const SECRET: &str = "unit-test-signing-secret";

fn directory() -> InMemoryIdentityDirectory {
    InMemoryIdentityDirectory::with_principals(vec![Principal::new(
        "alice",
        "$2b$04$unused",
        vec![Role::new("ROLE_ADMIN"), Role::new("ROLE_USER")],
    )])
}

fn create_test_service_with_ttl(ttl: Duration) -> TokenService<InMemoryIdentityDirectory> {
    TokenService::new(directory(), TokenServiceConfig::new(SECRET, ttl))
        .expect("Failed to create token service")
}

fn create_test_service() -> TokenService<InMemoryIdentityDirectory> {
    create_test_service_with_ttl(Duration::hours(1))
}

fn roles() -> Vec<Role> {
    vec![Role::new("ROLE_USER"), Role::new("ROLE_ADMIN")]
}

fn replace_segment(token: &str, index: usize, segment: &str) -> String {
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[index] = segment;
    parts.join(".")
}

#[test]
fn test_issue_round_trip_subject() {
    let service = create_test_service();

    for subject in ["alice", "bob@example.com", "ünïcødé", ""] {
        let token = service.issue(subject, &roles()).unwrap();
        assert_eq!(service.subject_of(&token).unwrap(), subject);
    }
}

#[test]
fn test_issue_preserves_role_order() {
    let service = create_test_service();
    let token = service.issue("alice", &roles()).unwrap();

    let claims = service.inspect(&token).into_claims().unwrap();
    assert_eq!(claims.roles, vec!["ROLE_USER", "ROLE_ADMIN"]);
}

#[test]
fn test_issue_sets_timestamps_from_ttl() {
    let service = create_test_service_with_ttl(Duration::minutes(15));
    let issued_at = Utc.timestamp_opt(1_800_000_000, 0).unwrap();

    let token = service.issue_at("alice", &[], issued_at).unwrap();
    let claims = service
        .inspect_at(&token, issued_at)
        .into_claims()
        .unwrap();

    assert_eq!(claims.iat, 1_800_000_000);
    assert_eq!(claims.exp, 1_800_000_000 + 15 * 60);
}

#[test]
fn test_token_wire_format() {
    let service = create_test_service();
    let token = service.issue("alice", &roles()).unwrap();

    assert_eq!(token.split('.').count(), 3);
    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::HS512);
    assert_eq!(SIGNING_ALGORITHM, Algorithm::HS512);

    let claims_segment = token.split('.').nth(1).unwrap();
    let payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims_segment).unwrap()).unwrap();
    assert_eq!(payload["sub"], "alice");
    assert_eq!(payload["roles"], serde_json::json!(["ROLE_USER", "ROLE_ADMIN"]));
    assert!(payload["iat"].is_i64());
    assert!(payload["exp"].is_i64());
}

#[test]
fn test_signing_key_is_the_raw_secret() {
    // Normalization encodes the secret once and the key decodes it again, so
    // any HS512 verifier holding the raw secret accepts the token.
    let service = create_test_service();
    let token = service.issue("alice", &[]).unwrap();

    let data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::new(Algorithm::HS512),
    )
    .unwrap();
    assert_eq!(data.claims.sub, "alice");
}

#[test]
fn test_issue_is_deterministic_for_same_instant() {
    let service = create_test_service();
    let now = Utc::now();

    let first = service.issue_at("alice", &roles(), now).unwrap();
    let second = service.issue_at("alice", &roles(), now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_issue_differs_across_instants() {
    let service = create_test_service();
    let now = Utc::now();

    let first = service.issue_at("alice", &roles(), now).unwrap();
    let second = service
        .issue_at("alice", &roles(), now + Duration::seconds(1))
        .unwrap();

    assert_ne!(first, second);
    assert_ne!(first.split('.').nth(2), second.split('.').nth(2));
}

#[test]
fn test_verify_valid_token() {
    let service = create_test_service();
    let token = service.issue("alice", &roles()).unwrap();

    assert!(service.verify(&token).unwrap());
    assert!(service.inspect(&token).is_valid());
}

#[test]
fn test_zero_ttl_token_is_expired_not_an_error() {
    let service = create_test_service_with_ttl(Duration::zero());
    let now = Utc::now();
    let token = service.issue_at("alice", &roles(), now).unwrap();

    assert!(!service.verify_at(&token, now).unwrap());
    assert!(!service.verify_at(&token, now + Duration::seconds(5)).unwrap());
    assert!(!service.verify(&token).unwrap());
    assert!(matches!(service.inspect(&token), TokenStatus::Expired(_)));
}

#[test]
fn test_expiration_boundary() {
    let service = create_test_service_with_ttl(Duration::seconds(60));
    let issued_at = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
    let token = service.issue_at("alice", &[], issued_at).unwrap();

    assert!(service
        .verify_at(&token, issued_at + Duration::seconds(59))
        .unwrap());
    assert!(!service
        .verify_at(&token, issued_at + Duration::seconds(60))
        .unwrap());
}

#[test]
fn test_expired_token_still_yields_subject() {
    let service = create_test_service_with_ttl(Duration::zero());
    let token = service.issue("alice", &[]).unwrap();

    assert_eq!(service.subject_of(&token).unwrap(), "alice");
}

#[test]
fn test_tampered_signature_is_rejected() {
    let service = create_test_service();
    let token = service.issue("alice", &roles()).unwrap();
    let signature = token.split('.').nth(2).unwrap().to_string();

    for index in [0, signature.len() / 2, signature.len() - 2] {
        let mut chars: Vec<char> = signature.chars().collect();
        chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
        let tampered = replace_segment(&token, 2, &chars.into_iter().collect::<String>());

        let result = service.verify(&tampered);
        assert!(
            matches!(
                result,
                Err(DomainError::Token(TokenError::InvalidSignature))
                    | Err(DomainError::Token(TokenError::InvalidTokenFormat))
            ),
            "tampered token at {} was not rejected: {:?}",
            index,
            result
        );
    }
}

#[test]
fn test_tampered_claims_are_rejected() {
    let service = create_test_service();
    let token = service.issue("alice", &roles()).unwrap();

    let forged = Claims::new("mallory", &roles(), Utc::now(), Duration::hours(1)).unwrap();
    let forged_segment = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
    let tampered = replace_segment(&token, 1, &forged_segment);

    assert_eq!(service.inspect(&tampered), TokenStatus::BadSignature);
    assert!(matches!(
        service.subject_of(&tampered),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_token_from_other_key_is_rejected() {
    let service = create_test_service();
    let other = TokenService::new(
        directory(),
        TokenServiceConfig::new("another-secret", Duration::hours(1)),
    )
    .unwrap();

    let token = other.issue("alice", &roles()).unwrap();
    assert!(matches!(
        service.verify(&token),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[test]
fn test_token_with_other_algorithm_is_rejected() {
    let service = create_test_service();
    let claims = Claims::new("alice", &[], Utc::now(), Duration::hours(1)).unwrap();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(service.verify(&token).is_err());
    assert!(!service.inspect(&token).is_valid());
}

#[test]
fn test_malformed_tokens() {
    let service = create_test_service();

    for token in ["", "not-a-token", "a.b", "a.b.c", "...."] {
        assert_eq!(service.inspect(token), TokenStatus::Malformed, "token {:?}", token);
        assert!(matches!(
            service.verify(token),
            Err(DomainError::Token(TokenError::InvalidTokenFormat))
        ));
        assert!(matches!(
            service.subject_of(token),
            Err(DomainError::Token(TokenError::InvalidTokenFormat))
        ));
    }
}

#[test]
fn test_new_rejects_empty_secret() {
    let result = TokenService::new(directory(), TokenServiceConfig::new("  ", Duration::hours(1)));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_new_rejects_negative_ttl() {
    let result = TokenService::new(directory(), TokenServiceConfig::new(SECRET, Duration::seconds(-1)));
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_new_rejects_oversized_ttl() {
    let result = TokenService::new(
        directory(),
        TokenServiceConfig::new(SECRET, Duration::seconds(10_000_000_000_000)),
    );
    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[test]
fn test_from_jwt_config_rejects_oversized_expiration() {
    for seconds in [i64::MAX, 10_000_000_000_000] {
        let jwt = st_shared::JwtConfig::new(SECRET).with_expiration_seconds(seconds);

        assert!(TokenServiceConfig::try_from(&jwt).is_err());
        assert!(matches!(
            TokenService::from_jwt_config(directory(), &jwt),
            Err(DomainError::Configuration { .. })
        ));
    }
}

#[test]
fn test_issue_with_unrepresentable_expiry_fails() {
    let service = create_test_service();

    let err = service
        .issue_at("alice", &[], chrono::DateTime::<Utc>::MAX_UTC)
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenGenerationFailed)));
}

#[test]
fn test_from_jwt_config() {
    let jwt = st_shared::JwtConfig::new(SECRET)
        .with_expiration_seconds(90)
        .with_header("X-Session", "Token ");
    let service = TokenService::from_jwt_config(directory(), &jwt).unwrap();

    assert_eq!(service.token_ttl_seconds(), 90);
    assert_eq!(service.header_name(), "X-Session");
    assert_eq!(service.header_prefix(), "Token ");

    let missing = st_shared::JwtConfig::default();
    assert!(matches!(
        TokenService::from_jwt_config(directory(), &missing),
        Err(DomainError::Configuration { .. })
    ));
}

#[test]
fn test_debug_does_not_leak_secret() {
    let service = create_test_service();
    let rendered = format!("{:?}", service);

    assert!(!rendered.contains(SECRET));
    assert!(rendered.contains("HS512"));
}

#[test]
fn test_services_with_different_configs_coexist() {
    let short = create_test_service_with_ttl(Duration::zero());
    let long = create_test_service_with_ttl(Duration::hours(2));

    let short_token = short.issue("alice", &[]).unwrap();
    let long_token = long.issue("alice", &[]).unwrap();

    // Same key, so each service accepts the other's signature.
    assert!(!long.verify(&short_token).unwrap());
    assert!(short.verify(&long_token).unwrap());
}

#[test]
fn test_concurrent_issuance() {
    let service = Arc::new(create_test_service());

    let tokens: Vec<(String, String)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = Arc::clone(&service);
                scope.spawn(move || {
                    let subject = format!("user-{}", i);
                    let token = service.issue(&subject, &roles()).unwrap();
                    (subject, token)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(tokens.len(), 16);
    for (subject, token) in &tokens {
        assert!(service.verify(token).unwrap());
        assert_eq!(&service.subject_of(token).unwrap(), subject);
    }
}

#[tokio::test]
async fn test_resolve_authentication() {
    let service = create_test_service();
    let token = service.issue("alice", &[Role::new("ROLE_USER")]).unwrap();

    let auth = service.resolve_authentication(&token).await.unwrap();
    assert_eq!(auth.name(), "alice");
    assert!(auth.credentials.is_empty());
    // Authorities come from the directory, not from the token's roles claim.
    assert_eq!(
        auth.authorities,
        vec![Role::new("ROLE_ADMIN"), Role::new("ROLE_USER")]
    );
}

#[tokio::test]
async fn test_resolve_authentication_unknown_subject() {
    let service = create_test_service();
    let token = service.issue("ghost", &[]).unwrap();

    let err = service.resolve_authentication(&token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::UnknownIdentity { ref name }) if name == "ghost"
    ));
}

#[tokio::test]
async fn test_resolve_authentication_bad_token() {
    let service = create_test_service();

    let err = service.resolve_authentication("garbage").await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidTokenFormat)));
}
