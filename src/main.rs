use anyhow::Result;
use clap::{Parser, Subcommand};

use sheweldo::cli::{self, CompanyArgs, FilterArgs, OptionsList, SalaryArgs};

#[derive(Debug, Parser)]
#[command(name = "sheweldo")]
#[command(about = "Salary transparency client: submit data and explore the charts")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate and submit the company form
    Company(CompanyArgs),
    /// Validate and submit the salary form
    Salary(SalaryArgs),
    /// Print the options of a selector
    Options {
        #[arg(value_enum)]
        list: OptionsList,
    },
    /// Draw the employee salary charts (requires a prior salary submission)
    Graph {
        #[command(flatten)]
        filters: FilterArgs,
        /// Edit filters from stdin and redraw on `apply`
        #[arg(long, short)]
        interactive: bool,
    },
    /// Draw the salary charts of one company
    Benchmark {
        /// Company hash
        company_hash: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, short)]
        interactive: bool,
    },
    /// Show whether the graph page is available for the stored cookies
    Guard,
    /// Summarize the client event log
    Log {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check config, backend reachability, cookies and the event log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.sheweldo/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.base_url`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Company(args) => cli::run_company(&args),
        Commands::Salary(args) => cli::run_salary(&args),
        Commands::Options { list } => cli::run_options(list),
        Commands::Graph {
            filters,
            interactive,
        } => cli::run_graph(&filters, interactive),
        Commands::Benchmark {
            company_hash,
            filters,
            interactive,
        } => cli::run_benchmark(&company_hash, &filters, interactive),
        Commands::Guard => cli::run_guard(),
        Commands::Log { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_log(fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
