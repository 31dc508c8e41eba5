//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an id from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a registered user account.
    UserId
);
uuid_id!(
    /// Unique identifier for an organization (tenant).
    OrgId
);
uuid_id!(
    /// Unique identifier for a registered knowledge source.
    SourceId
);
uuid_id!(
    /// Unique identifier for a conversation.
    ConversationId
);
uuid_id!(
    /// Unique identifier for a single message within a conversation.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display_and_parse() {
        let id = ConversationId::new();
        let parsed: ConversationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn ids_of_different_kinds_are_distinct_types() {
        // Compile-time property; the assertion below just keeps the test body non-empty.
        let user = UserId::new();
        let org = OrgId::new();
        assert_ne!(user.as_uuid(), org.as_uuid());
    }

    #[test]
    fn invalid_uuid_fails_to_parse() {
        assert!("not-a-uuid".parse::<OrgId>().is_err());
    }
}
