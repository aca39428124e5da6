use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use splitledger::cli::{
    handle_audit_command, handle_balance_command, handle_expense_command, handle_group_command,
    ExpenseCommands, GroupCommands,
};
use splitledger::config::{paths::DATA_DIR_ENV, LedgerPaths, Settings};
use splitledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "splitledger",
    version,
    about = "Shared-expense ledger with zero-sum group balances",
    long_about = "splitledger records shared expenses inside a group, splits each one \
                  exactly among its participants and derives who owes whom from an \
                  append-only ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group and membership commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Show member balances of a group
    Balance {
        /// Group name or ID
        group: String,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("splitledger=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Group(cmd)) => {
            handle_group_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Balance { group }) => {
            handle_balance_command(&storage, &settings, &group)?;
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&storage, limit)?;
        }
        Some(Commands::Init) => {
            println!("Initializing splitledger at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Create a group with 'splitledger group create <name> --creator <you>'.");
        }
        Some(Commands::Config) => {
            println!("splitledger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Override with:  {}", DATA_DIR_ENV);
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Remainder policy:     {}", settings.remainder_policy);
            println!("  Allow external payer: {}", settings.allow_external_payer);
            println!("  Initialized:          {}", storage.is_initialized());
        }
        None => {
            println!("splitledger - shared expenses, exact splits, zero-sum balances");
            println!();
            println!("Run 'splitledger --help' for usage information.");
        }
    }

    Ok(())
}
