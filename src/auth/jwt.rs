use crate::types::{AppError, Claims, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};

/// The only algorithm tokens are signed with and accepted under.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// A freshly signed session token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Session token issuer and verifier.
///
/// Holds the process-wide signing secret, loaded once at startup and never
/// changed afterwards. Issuing is pure: persisting the token in the session
/// registry is the caller's job.
pub struct AuthService {
    jwt_secret: String,
    token_ttl: i64,
}

impl AuthService {
    /// Creates a new AuthService.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing tokens (should be at least 32 chars)
    /// * `token_ttl` - Token validity in seconds
    pub fn new(jwt_secret: String, token_ttl: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl,
        }
    }

    /// Token validity in seconds.
    pub fn token_ttl(&self) -> i64 {
        self.token_ttl
    }

    /// Issues a session token for `email`, valid for the configured TTL from now.
    pub fn issue_token(&self, email: &str) -> Result<IssuedToken> {
        self.issue_token_at(email, Utc::now())
    }

    /// Issues a session token as if it were minted at `issued_at`.
    ///
    /// The token identifier is the subject email, so two tokens minted for
    /// the same subject within the same second are byte-identical.
    pub fn issue_token_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let expires_at = Duration::try_seconds(self.token_ttl)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Token lifetime of {}s is out of range", self.token_ttl))
            })?;

        let claims = Claims {
            sub: email.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: issued_at.timestamp() as usize,
            jti: email.to_string(),
        };

        let token = encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verifies algorithm, signature and expiry, and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.decode_with(token, true)
    }

    /// Verifies algorithm and signature only; an expired token still passes.
    pub fn verify_signature(&self, token: &str) -> Result<Claims> {
        self.decode_with(token, false)
    }

    fn decode_with(&self, token: &str, check_expiry: bool) -> Result<Claims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }

    /// Hashes a token using SHA256 for registry storage.
    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn create_test_service() -> AuthService {
        AuthService::new(SECRET.to_string(), 24 * 60 * 60)
    }

    #[test]
    fn test_token_issue_and_verify() {
        let service = create_test_service();

        let issued = service
            .issue_token("a@x.com")
            .expect("should issue token");
        assert!(!issued.token.is_empty(), "token should not be empty");

        let claims = service
            .verify_token(&issued.token)
            .expect("should verify token");

        assert_eq!(claims.sub, "a@x.com", "subject should be the email");
        assert_eq!(claims.jti, "a@x.com", "token id should be the email");
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_claims_expiration_is_a_day_out() {
        let service = create_test_service();
        let issued = service.issue_token("user@example.com").expect("should issue");

        let now = Utc::now().timestamp() as usize;
        let claims = issued.claims;

        assert!(
            claims.iat <= now && claims.iat + 5 >= now,
            "iat should be current timestamp"
        );
        assert_eq!(claims.exp, claims.iat + 86_400, "exp should be iat + 24h");
    }

    #[test]
    fn test_token_valid_until_expiry() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::hours(23) - Duration::minutes(59);

        let issued = service
            .issue_token_at("late@example.com", issued_at)
            .expect("should issue");

        assert!(service.verify_token(&issued.token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let issued = service
            .issue_token_at("old@example.com", Utc::now() - Duration::hours(25))
            .expect("should issue");

        let result = service.verify_token(&issued.token);
        assert!(matches!(result, Err(AppError::Auth(_))));

        // Signature-only checks still accept it
        let claims = service
            .verify_signature(&issued.token)
            .expect("signature should still be valid");
        assert_eq!(claims.sub, "old@example.com");
    }

    #[test]
    fn test_same_second_tokens_are_identical() {
        let service = create_test_service();
        let at = Utc::now();

        let first = service.issue_token_at("dup@example.com", at).expect("issue");
        let second = service.issue_token_at("dup@example.com", at).expect("issue");

        assert_eq!(first.token, second.token);

        let later = service
            .issue_token_at("dup@example.com", at + Duration::seconds(1))
            .expect("issue");
        assert_ne!(first.token, later.token);
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let service = AuthService::new(SECRET.to_string(), 360_000_000_000_000);
        let result = service.issue_token("a@x.com");
        assert!(matches!(result, Err(AppError::Internal(_))));

        let service = AuthService::new(SECRET.to_string(), i64::MAX);
        assert!(matches!(service.issue_token("a@x.com"), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_token_verification_invalid_token() {
        let service = create_test_service();

        let result = service.verify_token("invalid.token.here");

        assert!(result.is_err(), "invalid token should fail verification");
    }

    #[test]
    fn test_token_verification_wrong_secret() {
        let service1 = AuthService::new("secret-one-that-is-32-chars-long".to_string(), 900);
        let service2 = AuthService::new("secret-two-that-is-32-chars-long".to_string(), 900);

        let issued = service1
            .issue_token("test@example.com")
            .expect("should issue");

        assert!(
            service2.verify_token(&issued.token).is_err(),
            "token from different secret should fail"
        );
        assert!(service2.verify_signature(&issued.token).is_err());
    }

    #[test]
    fn test_every_altered_character_is_rejected() {
        let service = create_test_service();
        let issued = service.issue_token("a@x.com").expect("should issue");

        for (idx, original) in issued.token.char_indices() {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = issued.token.clone();
            tampered.replace_range(idx..idx + 1, &replacement.to_string());

            assert!(
                service.verify_token(&tampered).is_err(),
                "altering position {} should break verification",
                idx
            );
        }
    }

    #[test]
    fn test_other_algorithms_rejected() {
        let service = create_test_service();
        let claims = service.issue_token("a@x.com").expect("issue").claims;

        // Same secret, different HMAC variant
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("should encode");
        assert!(service.verify_token(&hs512).is_err());
        assert!(service.verify_signature(&hs512).is_err());

        // Unsigned token: {"alg":"none","typ":"JWT"}
        let payload = issued_payload_segment(&service);
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);
        assert!(service.verify_token(&unsigned).is_err());
    }

    fn issued_payload_segment(service: &AuthService) -> String {
        let token = service.issue_token("a@x.com").expect("issue").token;
        token.split('.').nth(1).expect("payload segment").to_string()
    }

    #[test]
    fn test_hash_token() {
        let service = create_test_service();

        let hash1 = service.hash_token("some-token");
        let hash2 = service.hash_token("some-token");

        // Same token should produce same hash
        assert_eq!(hash1, hash2, "same token should hash to same value");

        // Hash should be a hex string (64 chars for SHA256)
        assert_eq!(hash1.len(), 64, "SHA256 hash should be 64 hex characters");
        assert!(
            hash1.chars().all(|c| c.is_ascii_hexdigit()),
            "hash should be hex"
        );

        assert_ne!(hash1, service.hash_token("other-token"));
    }
}
