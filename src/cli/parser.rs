use clap::{Parser, Subcommand};

/// Command-line interface definition for rPresence
/// Attendance punch-clock backend over SQLite
#[derive(Parser)]
#[command(
    name = "rpresence",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance punch-clock backend: serve and manage presence records stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run the HTTP API
    Serve {
        #[arg(long = "bind", help = "Listen address, e.g. 127.0.0.1:8000")]
        bind: Option<String>,
    },

    /// Manage users (employees, managers, admins)
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// List presences visible to a user
    List {
        #[arg(long = "as", help = "User id whose visibility applies")]
        as_user: i64,

        #[arg(long = "magasin", help = "Only presences at this store id")]
        magasin: Option<i64>,

        #[arg(long = "type", help = "arrivee, depart, pause_entree or pause_sortie")]
        kind: Option<String>,

        #[arg(long = "asc", help = "Oldest punch first")]
        asc: bool,
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

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user
    Add {
        #[arg(long)]
        email: String,

        #[arg(long, help = "Last name")]
        nom: String,

        #[arg(long, help = "First name")]
        prenom: String,

        #[arg(long, default_value = "employe", help = "admin, manager or employe")]
        role: String,

        #[arg(long, help = "Assigned store id")]
        magasin: Option<i64>,
    },

    /// List users
    List,

    /// Delete a user (their presences are kept without owner)
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum StoreAction {
    /// Add a store
    Add {
        #[arg(long, help = "Display name")]
        nom: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List stores
    List,

    /// Rename a store (existing presences keep the old name)
    Rename {
        id: i64,

        #[arg(long)]
        nom: String,
    },
}
