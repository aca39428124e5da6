//! Expense display formatting
//!
//! Formats expenses for terminal output in table and detail views. Member
//! ids are resolved to names through the owning group.

use crate::models::{Expense, Group, MemberId};
use crate::services::ExpenseDetails;

fn member_name(group: &Group, id: MemberId) -> String {
    group
        .member(id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| id.short())
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[Expense], group: &Group, symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let payers: Vec<String> = expenses
        .iter()
        .map(|e| member_name(group, e.paid_by))
        .collect();

    let desc_width = expenses
        .iter()
        .map(|e| e.description.len())
        .max()
        .unwrap_or(11)
        .clamp(11, 40);

    let payer_width = payers.iter().map(|p| p.len()).max().unwrap_or(7).max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {}\n",
        "ID",
        "Date",
        "Description",
        "Paid by",
        "Amount",
        "Split",
        desc_width = desc_width,
        payer_width = payer_width,
    ));

    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<desc_width$}  {:-<payer_width$}  {:->12}  {:-<5}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        desc_width = desc_width,
        payer_width = payer_width,
    ));

    for (expense, payer) in expenses.iter().zip(&payers) {
        let description = if expense.description.len() > desc_width {
            let cut: String = expense.description.chars().take(desc_width - 3).collect();
            format!("{}...", cut)
        } else {
            expense.description.clone()
        };

        output.push_str(&format!(
            "{:<12}  {:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {}\n",
            expense.id.short(),
            expense.created_at.format("%Y-%m-%d"),
            description,
            payer,
            expense.amount.format_with_symbol(symbol),
            expense.split_type,
            desc_width = desc_width,
            payer_width = payer_width,
        ));
    }

    output
}

/// Format one expense with its splits and ledger entries
pub fn format_expense_details(details: &ExpenseDetails, group: &Group, symbol: &str) -> String {
    let expense = &details.expense;
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.description));
    output.push_str(&format!("  ID:      {}\n", expense.id));
    output.push_str(&format!("  Group:   {}\n", group.name));
    output.push_str(&format!(
        "  Date:    {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "  Paid by: {}\n",
        member_name(group, expense.paid_by)
    ));
    output.push_str(&format!(
        "  Amount:  {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Split:   {}\n", expense.split_type));

    output.push_str("\n  Shares:\n");
    for split in &details.splits {
        output.push_str(&format!(
            "    {:<20}  {:>12}\n",
            member_name(group, split.member_id),
            split.amount.format_with_symbol(symbol)
        ));
    }

    output.push_str("\n  Ledger entries:\n");
    for entry in &details.entries {
        output.push_str(&format!(
            "    {:<20}  {:>12}\n",
            member_name(group, entry.member_id),
            entry.delta.format_with_symbol(symbol)
        ));
    }

    output
}
