//! Session token claims and role resolution

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Role tag carried by a session token ("MEMBER", "LIBRARIAN", ...).
/// The set is open: the backend may introduce new roles without a client
/// release, so this stays a plain string rather than an enum.
pub type Role = String;

/// Which claim layout to accept when resolving roles from a token.
///
/// The backend has shipped two layouts over time: a `roles` string array
/// and a single `role` string. `Auto` accepts both, preferring the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSchema {
    Auto,
    RolesArray,
    SingleRole,
}

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    #[serde(default)]
    pub iat: i64,
}

impl TokenClaims {
    /// Parse a token without verifying its signature.
    ///
    /// The client holds no signing secret; trust comes from the backend
    /// rejecting a tampered token on the next API call. Expiry is NOT
    /// checked here - the inspector enforces the strict `exp > now` rule
    /// itself, without the library's leeway.
    pub fn from_token(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Self>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(token_data.claims)
    }

    /// Resolve the role list according to the configured claim schema.
    /// Returns an empty list when the expected field is absent or empty.
    pub fn resolve_roles(&self, schema: ClaimSchema) -> Vec<&str> {
        match schema {
            ClaimSchema::RolesArray => self.roles_from_array(),
            ClaimSchema::SingleRole => self.roles_from_single(),
            ClaimSchema::Auto => {
                let roles = self.roles_from_array();
                if roles.is_empty() {
                    self.roles_from_single()
                } else {
                    roles
                }
            }
        }
    }

    fn roles_from_array(&self) -> Vec<&str> {
        self.roles
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn roles_from_single(&self) -> Vec<&str> {
        self.role.as_deref().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("Failed to encode token")
    }

    #[test]
    fn test_decode_roles_array() {
        let token = mint(&json!({
            "sub": "alice",
            "roles": ["LIBRARIAN", "MEMBER"],
            "exp": 4_000_000_000i64,
            "iat": 1_700_000_000i64,
        }));
        let claims = TokenClaims::from_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(
            claims.resolve_roles(ClaimSchema::RolesArray),
            vec!["LIBRARIAN", "MEMBER"]
        );
    }

    #[test]
    fn test_decode_single_role() {
        let token = mint(&json!({
            "sub": "bob",
            "role": "MEMBER",
            "exp": 4_000_000_000i64,
        }));
        let claims = TokenClaims::from_token(&token).unwrap();
        assert_eq!(claims.resolve_roles(ClaimSchema::SingleRole), vec!["MEMBER"]);
        // iat is optional in this revision of the backend
        assert_eq!(claims.iat, 0);
    }

    #[test]
    fn test_auto_prefers_array_then_falls_back() {
        let both = mint(&json!({
            "sub": "carol",
            "roles": ["LIBRARIAN"],
            "role": "MEMBER",
            "exp": 4_000_000_000i64,
        }));
        let claims = TokenClaims::from_token(&both).unwrap();
        assert_eq!(claims.resolve_roles(ClaimSchema::Auto), vec!["LIBRARIAN"]);

        let single_only = mint(&json!({
            "sub": "carol",
            "role": "MEMBER",
            "exp": 4_000_000_000i64,
        }));
        let claims = TokenClaims::from_token(&single_only).unwrap();
        assert_eq!(claims.resolve_roles(ClaimSchema::Auto), vec!["MEMBER"]);
    }

    #[test]
    fn test_no_role_fields_resolves_empty() {
        let token = mint(&json!({
            "sub": "dave",
            "exp": 4_000_000_000i64,
        }));
        let claims = TokenClaims::from_token(&token).unwrap();
        assert!(claims.resolve_roles(ClaimSchema::Auto).is_empty());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(TokenClaims::from_token("not-a-token").is_err());
        assert!(TokenClaims::from_token("").is_err());
        assert!(TokenClaims::from_token("a.b.c").is_err());
    }

    #[test]
    fn test_signature_not_verified() {
        // A token signed with an unknown secret still decodes; the client
        // never holds the backend's signing key.
        let token = mint(&json!({
            "sub": "eve",
            "roles": ["MEMBER"],
            "exp": 4_000_000_000i64,
        }));
        assert!(TokenClaims::from_token(&token).is_ok());
    }
}
