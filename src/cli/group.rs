//! Group CLI commands
//!
//! Implements CLI commands for groups and membership.

use clap::Subcommand;

use crate::display::group::{format_group_details, format_group_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Group;
use crate::services::GroupService;
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Name of the creating member, who becomes the group admin
        #[arg(short, long)]
        creator: String,
    },
    /// Add a member to a group
    AddMember {
        /// Group name or ID
        group: String,
        /// Member name
        name: String,
    },
    /// List all groups
    List,
    /// Show group details
    Show {
        /// Group name or ID
        group: String,
    },
}

/// Resolve a group by name or ID, failing when it does not exist
pub fn resolve_group(service: &GroupService<'_>, identifier: &str) -> LedgerResult<Group> {
    service
        .find(identifier)?
        .ok_or_else(|| LedgerError::group_not_found(identifier))
}

/// Handle a group command
pub fn handle_group_command(storage: &Storage, cmd: GroupCommands) -> LedgerResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::Create { name, creator } => {
            let group = service.create(&name, &creator)?;

            println!("Created group: {}", group.name);
            println!("  Admin: {}", group.members[0].name);
            println!("  ID: {}", group.id);
        }

        GroupCommands::AddMember { group, name } => {
            let found = resolve_group(&service, &group)?;
            let member = service.add_member(found.id, &name)?;

            println!("Added {} to {}", member.name, found.name);
            println!("  ID: {}", member.id);
        }

        GroupCommands::List => {
            let groups = service.list()?;
            print!("{}", format_group_list(&groups));
        }

        GroupCommands::Show { group } => {
            let found = resolve_group(&service, &group)?;
            print!("{}", format_group_details(&found));
        }
    }

    Ok(())
}
