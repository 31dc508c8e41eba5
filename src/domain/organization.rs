//! Organization (tenant) entity and membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrgId, UserId};

/// A tenant: the unit of data isolation and policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization with a fresh id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: OrgId::new(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// Role of a user within an organization.
///
/// Authorization currently treats any membership as ownership; the role
/// is recorded so multi-admin organizations can distinguish the two
/// without a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Member => "member",
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MemberRole::Owner),
            "member" => Ok(MemberRole::Member),
            other => Err(format!("unknown member role: {}", other)),
        }
    }
}

/// A user's membership in an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub org_id: OrgId,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

/// A registered user account.
///
/// The password hash never leaves the identity service; it is skipped
/// on serialization so it cannot leak through logs or API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_organization_gets_fresh_id() {
        let a = Organization::new("acme", "docs");
        let b = Organization::new("acme", "docs");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn member_role_round_trips() {
        assert_eq!("owner".parse::<MemberRole>().unwrap(), MemberRole::Owner);
        assert_eq!("member".parse::<MemberRole>().unwrap(), MemberRole::Member);
        assert!("admin".parse::<MemberRole>().is_err());
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: UserId::new(),
            email: "dev@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
