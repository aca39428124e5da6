//! Group display formatting
//!
//! Formats groups and their members for terminal output.

use crate::models::Group;

/// Format a list of groups as a table
pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found.".to_string();
    }

    let name_width = groups
        .iter()
        .map(|g| g.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:<12}  {}\n",
        "Name",
        "Members",
        "ID",
        "Created",
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:-<12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for group in groups {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:<12}  {}\n",
            group.name,
            group.members.len(),
            group.id.short(),
            group.created_at.format("%Y-%m-%d"),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single group with its members
pub fn format_group_details(group: &Group) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:      {}\n", group.id));
    output.push_str(&format!(
        "  Created: {}\n",
        group.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("  Members ({}):\n", group.members.len()));

    for member in &group.members {
        output.push_str(&format!(
            "    {:<20}  {:<6}  {}\n",
            member.name,
            member.role,
            member.id.short()
        ));
    }

    output
}
