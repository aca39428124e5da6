//! Expense CLI commands
//!
//! Implements CLI commands for recording and inspecting expenses. The acting
//! member (`--as`) is the payer and must belong to the group.

use std::collections::BTreeMap;

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, MemberId, Money, SplitStrategy};
use crate::services::{CreateExpenseInput, ExpenseService, GroupService};
use crate::storage::Storage;

use super::group::resolve_group;

/// Split strategy names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Equal,
    Exact,
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// Group name or ID
        group: String,
        /// Amount (e.g., "42.50" or "42")
        amount: String,
        /// What the money was spent on
        description: String,
        /// Acting member, who paid
        #[arg(long = "as", env = "SPLITLEDGER_USER")]
        actor: String,
        /// How to divide the amount
        #[arg(short, long, value_enum, default_value = "equal")]
        split: SplitArg,
        /// Participant (repeatable); defaults to every member for equal splits
        #[arg(short, long = "with")]
        with: Vec<String>,
        /// Exact share as MEMBER=AMOUNT (repeatable)
        #[arg(short, long)]
        exact: Vec<String>,
    },
    /// List a group's expenses, newest first
    List {
        /// Group name or ID
        group: String,
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show an expense with its shares and ledger entries
    Show {
        /// Group name or ID
        group: String,
        /// Expense ID (full or short form)
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let groups = GroupService::new(storage);
    let service = ExpenseService::new(storage, settings);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            group,
            amount,
            description,
            actor,
            split,
            with,
            exact,
        } => {
            let group = resolve_group(&groups, &group)?;
            let payer = groups.find_member(&group, &actor)?;
            groups.authorize(group.id, payer.id)?;

            let amount = Money::parse(&amount).map_err(|e| {
                LedgerError::InvalidAmount(format!(
                    "'{}' is not a valid amount. Use a format like '42.50' or '42'. Error: {}",
                    amount, e
                ))
            })?;

            let mut participants = resolve_members(&groups, &group, &with)?;

            let strategy = match split {
                SplitArg::Equal => {
                    if !exact.is_empty() {
                        return Err(LedgerError::InvalidSplit(
                            "--exact is only valid with --split exact".into(),
                        ));
                    }
                    if participants.is_empty() {
                        participants = group.member_ids();
                    }
                    SplitStrategy::Equal
                }
                SplitArg::Exact => {
                    let parsed = parse_exact_amounts(&groups, &group, &exact)?;
                    if participants.is_empty() {
                        participants = parsed.iter().map(|(id, _)| *id).collect();
                    }
                    let mut amounts = BTreeMap::new();
                    for (id, share) in parsed {
                        if amounts.insert(id, share).is_some() {
                            return Err(LedgerError::InvalidSplit(format!(
                                "exact amount for {} given more than once",
                                id
                            )));
                        }
                    }
                    SplitStrategy::Exact(amounts)
                }
            };

            let details = service.create(CreateExpenseInput {
                group_id: group.id,
                paid_by: payer.id,
                amount,
                description,
                strategy,
                participants,
            })?;

            println!(
                "Recorded expense: {} ({})",
                details.expense.description,
                details.expense.amount.format_with_symbol(symbol)
            );
            println!("  Paid by: {}", payer.name);
            for split in &details.splits {
                let name = group
                    .member(split.member_id)
                    .map(|m| m.name.as_str())
                    .unwrap_or("?");
                println!("  {}: {}", name, split.amount.format_with_symbol(symbol));
            }
            println!("  ID: {}", details.expense.id);
        }

        ExpenseCommands::List { group, limit } => {
            let group = resolve_group(&groups, &group)?;
            let mut expenses = service.list_for_group(group.id)?;
            expenses.truncate(limit);
            print!("{}", format_expense_list(&expenses, &group, symbol));
        }

        ExpenseCommands::Show { group, expense } => {
            let group = resolve_group(&groups, &group)?;
            let found = service
                .find(group.id, &expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;

            let details = service.details(found.id)?;
            print!("{}", format_expense_details(&details, &group, symbol));
        }
    }

    Ok(())
}

fn resolve_members(
    groups: &GroupService<'_>,
    group: &Group,
    names: &[String],
) -> LedgerResult<Vec<MemberId>> {
    names
        .iter()
        .map(|name| groups.find_member(group, name).map(|m| m.id))
        .collect()
}

/// Parse MEMBER=AMOUNT pairs, keeping their order
fn parse_exact_amounts(
    groups: &GroupService<'_>,
    group: &Group,
    pairs: &[String],
) -> LedgerResult<Vec<(MemberId, Money)>> {
    if pairs.is_empty() {
        return Err(LedgerError::InvalidSplit(
            "--split exact needs at least one --exact MEMBER=AMOUNT".into(),
        ));
    }

    pairs
        .iter()
        .map(|pair| {
            let (name, amount) = pair.rsplit_once('=').ok_or_else(|| {
                LedgerError::InvalidSplit(format!("expected MEMBER=AMOUNT, got '{}'", pair))
            })?;

            let member = groups.find_member(group, name)?;
            let share = Money::parse(amount).map_err(|e| {
                LedgerError::InvalidSplit(format!("invalid amount for {}: {}", name.trim(), e))
            })?;

            Ok((member.id, share))
        })
        .collect()
}
