use clap::{Parser, Subcommand};

/// Command-line interface definition for Workforce Hub
/// Clock in/out against the attendance service and track breaks locally
#[derive(Parser)]
#[command(
    name = "workforce-hub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Workforce Hub attendance CLI: clock in/out, track breaks and worked time",
    long_about = None
)]
pub struct Cli {
    /// Override state database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the attendance service base URL
    #[arg(global = true, long = "api-url")]
    pub api_url: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the state database
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

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

    /// Show the current work session
    Status {
        #[arg(long = "json", help = "Print the session as JSON")]
        json: bool,

        #[arg(long = "offline", help = "Skip reconciliation with the attendance service")]
        offline: bool,
    },

    /// Reconcile the local session with today's attendance record
    Sync,

    /// Clock in for today
    ClockIn {
        #[arg(long = "remarks", help = "Remarks sent with the clock-in")]
        remarks: Option<String>,
    },

    /// Clock out of the current session
    ClockOut {
        #[arg(long = "remarks", help = "Remarks sent with the clock-out")]
        remarks: Option<String>,
    },

    /// Start or end a break
    Break {
        #[command(subcommand)]
        action: BreakAction,
    },

    /// Run the live timers in the foreground
    Watch {
        #[arg(long = "seconds", help = "Stop after this many seconds")]
        seconds: Option<u64>,

        #[arg(long = "offline", help = "Skip reconciliation with the attendance service")]
        offline: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum BreakAction {
    /// Start a break: morning, lunch, afternoon, or any other label
    Start {
        /// Break type (free-form labels such as "Lunch Break" are accepted)
        kind: String,
    },

    /// End the current break
    End,
}
