//! Balance CLI command

use tracing::warn;

use crate::config::Settings;
use crate::display::balance::format_balances;
use crate::error::LedgerResult;
use crate::services::{BalanceService, GroupService};
use crate::storage::Storage;

use super::group::resolve_group;

/// Print the derived balances of a group
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    group: &str,
) -> LedgerResult<()> {
    let group = resolve_group(&GroupService::new(storage), group)?;
    let balances = BalanceService::new(storage).balances_for(group.id)?;

    if !balances.is_balanced() {
        warn!(group_id = %group.id, "balances do not net to zero");
    }

    println!("Balances for {}", group.name);
    println!();
    print!(
        "{}",
        format_balances(&balances, settings.currency_symbol.as_str())
    );

    Ok(())
}
