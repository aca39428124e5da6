//! Group service
//!
//! Group creation, membership and the authorization check used before a
//! member acts on a group.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, GroupId, Member, MemberId, MemberRole};
use crate::storage::Storage;

/// Service for group and membership management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

impl<'a> GroupService<'a> {
    /// Create a new group service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a group with its creator as the first (admin) member
    pub fn create(&self, name: &str, creator_name: &str) -> LedgerResult<Group> {
        let name = name.trim();
        let group = Group::new(name, creator_name.trim());
        group.validate()?;

        self.storage.groups.modify(|groups| {
            if groups.values().any(|g| g.name.eq_ignore_ascii_case(name)) {
                return Err(LedgerError::Duplicate {
                    entity_type: "Group",
                    identifier: name.to_string(),
                });
            }
            groups.insert(group.id, group.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        Ok(group)
    }

    /// Add a member to an existing group
    ///
    /// The member joins the group as currently stored, keeping members added
    /// through other handles.
    pub fn add_member(&self, group_id: GroupId, name: &str) -> LedgerResult<Member> {
        let member = Member::new(name.trim(), MemberRole::Member);

        let group = self.storage.groups.modify(|groups| {
            let group = groups
                .get_mut(&group_id)
                .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;

            let mut updated = group.clone();
            updated.members.push(member.clone());
            updated.validate()?;

            *group = updated.clone();
            Ok(updated)
        })?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(format!("{} in {}", member.name, group.name)),
            &member,
        )?;

        Ok(member)
    }

    /// Get a group by ID, failing when it does not exist
    pub fn get(&self, id: GroupId) -> LedgerResult<Group> {
        self.storage
            .groups
            .get(id)?
            .ok_or_else(|| LedgerError::group_not_found(id.to_string()))
    }

    /// Find a group by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Group>> {
        if let Some(group) = self.storage.groups.get_by_name(identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.trim().parse::<GroupId>() {
            return self.storage.groups.get(id);
        }

        Ok(None)
    }

    /// Find a member of a group by name or ID string
    pub fn find_member(&self, group: &Group, identifier: &str) -> LedgerResult<Member> {
        group
            .find_member(identifier)
            .cloned()
            .ok_or_else(|| LedgerError::member_not_found(format!("{} in {}", identifier, group.name)))
    }

    /// Get all groups, oldest first
    pub fn list(&self) -> LedgerResult<Vec<Group>> {
        self.storage.groups.get_all()
    }

    /// Ensure a member may act on a group
    pub fn authorize(&self, group_id: GroupId, member_id: MemberId) -> LedgerResult<()> {
        let group = self.get(group_id)?;

        if group.is_member(member_id) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "{} is not a member of {}",
                member_id, group.name
            )))
        }
    }
}
