//! Balance display formatting

use crate::models::GroupBalances;

/// Format a group's balances as a table with a status column
pub fn format_balances(balances: &GroupBalances, symbol: &str) -> String {
    if balances.is_empty() {
        return "No members found.".to_string();
    }

    let names: Vec<String> = balances
        .balances
        .iter()
        .map(|b| {
            b.member_name
                .clone()
                .unwrap_or_else(|| format!("(former) {}", b.member_id.short()))
        })
        .collect();

    let name_width = names.iter().map(|n| n.len()).max().unwrap_or(6).max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {}\n",
        "Member",
        "Balance",
        "Status",
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (balance, name) in balances.balances.iter().zip(&names) {
        let status = if balance.owes() {
            "owes"
        } else if balance.is_owed() {
            "is owed"
        } else {
            "settled"
        };

        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {}\n",
            name,
            balance.amount.format_with_symbol(symbol),
            status,
            name_width = name_width,
        ));
    }

    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:<name_width$}  {:>12}\n",
        "TOTAL",
        balances
            .total()
            .map(|t| t.format_with_symbol(symbol))
            .unwrap_or_else(|| "overflow".to_string()),
        name_width = name_width,
    ));

    output
}
