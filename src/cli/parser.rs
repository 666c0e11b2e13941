use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for driverdesk
#[derive(Parser)]
#[command(
    name = "driverdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Collect driver questionnaires and review, search, delete and export them from a live roster",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Fill in and submit a driver questionnaire (no login needed)
    Submit(SubmitArgs),

    /// Sign in as an operator
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the operator currently signed in
    Whoami,

    /// Manage operator accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List drivers (requires login)
    List {
        #[arg(long, short, help = "Case-insensitive search on full name")]
        search: Option<String>,
    },

    /// Show the full questionnaire of one driver (requires login)
    Show {
        /// Driver id
        id: String,
    },

    /// Delete drivers by id (requires login)
    Del {
        /// Driver ids
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Export drivers (requires login)
    Export {
        /// Driver ids; omit together with --all to export every match
        ids: Vec<String>,

        #[arg(long, conflicts_with = "ids", help = "Export every driver matching --search")]
        all: bool,

        #[arg(long, short, help = "Case-insensitive search on full name (with --all)")]
        search: Option<String>,

        #[arg(long, value_enum, default_value = "txt")]
        format: ExportFormat,

        #[arg(
            long,
            value_name = "DIR",
            help = "Directory for txt sheets (default: export_dir from config)"
        )]
        dir: Option<String>,

        #[arg(long, value_name = "FILE", help = "Output file for csv/json")]
        file: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite existing files without asking")]
        force: bool,
    },

    /// Open the interactive live roster (requires login)
    Roster,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SubmitArgs {
    #[arg(long = "full-name", default_value = "")]
    pub full_name: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub pesel: String,

    #[arg(long, help = "Children and relatives")]
    pub children: Option<String>,

    #[arg(long, help = "Education and work history")]
    pub education: Option<String>,

    #[arg(long = "bank-account", default_value = "")]
    pub bank_account: String,

    #[arg(long, default_value = "", help = "Years of E+C driving in Europe (0-35)")]
    pub experience: String,

    #[arg(long = "emergency-name", default_value = "")]
    pub emergency_name: String,

    #[arg(long = "emergency-phone", default_value = "")]
    pub emergency_phone: String,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an operator account
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// List operator accounts
    List,

    /// Delete an operator account
    Del {
        #[arg(long)]
        email: String,
    },
}
