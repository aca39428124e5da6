//! Strongly-typed ID wrappers for all entity types
//!
//! A member id can never be passed where an expense id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form used in listings
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(GroupId, "grp-");
define_id!(MemberId, "mbr-");
define_id!(ExpenseId, "exp-");
define_id!(EntryId, "led-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_round_trips_through_parse() {
        let id = ExpenseId::new();
        let display = id.to_string();
        assert!(display.starts_with("exp-"));

        let parsed: ExpenseId = display.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_bare_uuid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: MemberId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_short_form() {
        let id = GroupId::new();
        let short = id.short();
        assert!(short.starts_with("grp-"));
        assert_eq!(short.len(), 12);
    }

    #[test]
    fn test_id_serialization() {
        let id = MemberId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: MemberId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!("exp-not-a-uuid".parse::<ExpenseId>().is_err());
    }
}
