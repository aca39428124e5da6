//! Group and membership models
//!
//! A group is the unit that owns expenses and whose balances must net to
//! zero. Membership is kept deliberately small: the ledger only needs a
//! stable member id and a display name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};

/// Role of a member within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Display name, unique within the group (case-insensitive)
    pub name: String,

    #[serde(default)]
    pub role: MemberRole,

    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
            role,
            joined_at: Utc::now(),
        }
    }
}

/// A group of members sharing expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    pub name: String,

    /// Members in the order they joined
    #[serde(default)]
    pub members: Vec<Member>,

    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a group whose first member is its admin
    pub fn new(name: impl Into<String>, creator_name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            members: vec![Member::new(creator_name, MemberRole::Admin)],
            created_at: Utc::now(),
        }
    }

    /// Look up a member by id
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Look up a member by name (case-insensitive) or id string
    pub fn find_member(&self, identifier: &str) -> Option<&Member> {
        let identifier = identifier.trim();
        if let Some(member) = self
            .members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(identifier))
        {
            return Some(member);
        }

        identifier
            .parse::<MemberId>()
            .ok()
            .and_then(|id| self.member(id))
    }

    pub fn is_member(&self, id: MemberId) -> bool {
        self.member(id).is_some()
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.members.is_empty() {
            return Err(GroupValidationError::NoMembers);
        }

        for (i, member) in self.members.iter().enumerate() {
            if member.name.trim().is_empty() {
                return Err(GroupValidationError::EmptyMemberName);
            }
            if self.members[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&member.name))
            {
                return Err(GroupValidationError::DuplicateMember(member.name.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NoMembers,
    EmptyMemberName,
    DuplicateMember(String),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NoMembers => write!(f, "Group must have at least one member"),
            Self::EmptyMemberName => write!(f, "Member name cannot be empty"),
            Self::DuplicateMember(name) => {
                write!(f, "Group already has a member named '{}'", name)
            }
        }
    }
}

impl std::error::Error for GroupValidationError {}
