//! Identity & access service.
//!
//! Session issuance and verification, organization ownership checks,
//! and the per-organization API key lifecycle. Password hashes and key
//! hashes never leave this module; plaintext key material exists only
//! in the instant it is returned to the caller.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::domain::foundation::{AppError, OrgId, UserId};
use crate::domain::organization::{MemberRole, User};
use crate::ports::{ApiKeyRepository, OrganizationRepository, UserRepository};

/// Prefix identifying Ragnet API keys.
const API_KEY_PREFIX: &str = "rn_live_";

/// JWT claims for a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Identity & access operations over the user, membership, and API key
/// stores.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    api_keys: Arc<dyn ApiKeyRepository>,
    config: AuthConfig,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        organizations: Arc<dyn OrganizationRepository>,
        api_keys: Arc<dyn ApiKeyRepository>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            organizations,
            api_keys,
            config,
        }
    }

    /// Registers-or-logs-in: an unknown email creates an account, a
    /// known email must present the matching password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }

        let user = match self.users.find_by_email(email).await? {
            Some(user) => {
                if !verify_password(password, &user.password_hash) {
                    return Err(AppError::invalid_credentials());
                }
                user
            }
            None => {
                let hash = hash_password(password)?;
                self.users.create(email, &hash).await?
            }
        };

        self.issue_session(&user.id)
    }

    /// Issues a signed session token for the user.
    pub fn issue_session(&self, user_id: &UserId) -> Result<String, AppError> {
        let exp = jsonwebtoken::get_current_timestamp() + self.config.token_ttl().as_secs();
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret().as_bytes()),
        )
        .map_err(|e| AppError::database(format!("failed to sign session token: {}", e)))
    }

    /// Verifies a session token and resolves it to a live user.
    pub async fn verify_session(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::invalid_token())?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AppError::invalid_token())?;

        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(AppError::invalid_token)
    }

    /// True iff a membership row exists for (org, user). The current
    /// model treats membership as ownership.
    pub async fn is_owner(&self, org_id: &OrgId, user_id: &UserId) -> Result<bool, AppError> {
        self.organizations.is_member(org_id, user_id).await
    }

    /// Resolves a user by email and adds them as a member; idempotent.
    pub async fn add_member_by_email(&self, org_id: &OrgId, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User", email.trim()))?;
        self.organizations
            .add_member(org_id, &user.id, MemberRole::Member)
            .await
    }

    /// Generates a fresh API key for the organization, storing only its
    /// hash and overwriting any prior key material. The returned
    /// plaintext is never retrievable again.
    pub async fn issue_api_key(&self, org_id: &OrgId) -> Result<String, AppError> {
        let mut bytes = [0u8; 20];
        OsRng.fill_bytes(&mut bytes);
        let plaintext = format!("{}{}", API_KEY_PREFIX, hex::encode(bytes));

        self.api_keys
            .upsert(org_id, &hash_api_key(&plaintext))
            .await?;
        Ok(plaintext)
    }

    /// Verifies a presented key against the organization it claims.
    /// A key issued for one org never validates against another: the
    /// lookup is by org, the comparison constant-time over the hashes.
    pub async fn verify_api_key(&self, presented: &str, org_id: &OrgId) -> Result<bool, AppError> {
        let Some(stored) = self.api_keys.hash_for_org(org_id).await? else {
            return Ok(false);
        };
        let recomputed = hash_api_key(presented);
        Ok(recomputed.as_bytes().ct_eq(stored.as_bytes()).into())
    }

    /// Revokes a key by its plaintext; idempotent for unknown keys.
    pub async fn revoke_api_key(&self, presented: &str) -> Result<(), AppError> {
        self.api_keys.delete_by_hash(&hash_api_key(presented)).await
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::database(format!("failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// One-way hash for API keys: deterministic so a presented key can be
/// recomputed and matched, stored as lowercase hex.
fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}
