use super::*;

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        expires_in_secs: 900,
    })
}

#[test]
fn test_issue_and_validate_round_trip() {
    let service = create_test_service();
    let account_id = AccountId::new();

    let token = service.issue(account_id).unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.account_id(), account_id);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let forger = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        expires_in_secs: 900,
    });
    let token = forger.issue(AccountId::new()).unwrap();

    let result = create_test_service().validate_token(&token);
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_expired_token() {
    // Validation::default() allows 60s of leeway.
    let service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        expires_in_secs: -120,
    });
    let token = service.issue(AccountId::new()).unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_claims_iat_is_current_time() {
    let before = Utc::now().timestamp();
    let claims = Claims::new(AccountId::new(), Utc::now() + Duration::hours(1));
    let after = Utc::now().timestamp();

    assert!(claims.iat >= before);
    assert!(claims.iat <= after);
}

#[test]
fn test_foreign_issuer_is_rejected() {
    let service = create_test_service();
    let mut claims = Claims::new(AccountId::new(), Utc::now() + Duration::hours(1));
    claims.iss = "elsewhere".to_string();
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret-key-for-testing"),
    )
    .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::DecodingError(_))
    ));
}

#[test]
fn test_claims_carry_issuer() {
    let claims = Claims::new(AccountId::new(), Utc::now());
    assert_eq!(claims.iss, SESSION_ISSUER);
}
