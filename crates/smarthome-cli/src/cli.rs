//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use smarthome_core::models::{ContentFilter, HourRange};

#[derive(Debug, Parser)]
#[command(name = "smarthome")]
#[command(about = "Dashboard for the mock smart-home backend")]
#[command(version)]
pub struct Cli {
    /// Backend URL (overrides config file and SMARTHOME_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Revoke the session and forget the stored tokens
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show the signed-in user
    Whoami,
    /// Manage the signed-in account
    #[command(subcommand)]
    Account(AccountCommand),
    /// Manage devices
    #[command(subcommand)]
    Devices(DeviceCommand),
    /// List devices grouped by room
    Rooms,
    /// List the devices in one room
    Room { name: String },
    /// Show the device action log
    Logs,
    /// View or change parental controls
    #[command(subcommand)]
    Parental(ParentalCommand),
    /// Show the current temperature reading
    Temperature,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Change username, password or email
    ///
    /// Username and password changes ask for the current password first.
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List all devices
    List,
    /// Add a device
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        device_type: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Change a device's name, type or room
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        device_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a device
    Remove { id: i64 },
    /// Turn a device on if it is off, off otherwise
    Toggle { id: i64 },
    /// Send an explicit action
    Control {
        id: i64,
        #[arg(value_parser = ["on", "off", "adjust"])]
        action: String,
        /// Value for `adjust` (JSON, or a plain string)
        #[arg(long, required_if_eq("action", "adjust"))]
        value: Option<String>,
    },
    /// Show a device's state and history
    Status { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ParentalCommand {
    /// Show the stored settings
    Show,
    /// Change settings; unspecified fields keep their stored value
    Set(ParentalArgs),
}

#[derive(Debug, Args)]
pub struct ParentalArgs {
    /// Start from the dashboard defaults instead of the stored settings
    #[arg(long)]
    pub defaults: bool,
    /// strict, moderate or none
    #[arg(long)]
    pub filter: Option<ContentFilter>,
    /// Allowed hours, e.g. 8-20
    #[arg(long)]
    pub time_limits: Option<HourRange>,
    /// Daily screen time in hours
    #[arg(long)]
    pub screen_time: Option<f64>,
    /// Bedtime hours, e.g. 22-6
    #[arg(long)]
    pub bedtime: Option<HourRange>,
    /// Internet access hours, e.g. 6-22
    #[arg(long)]
    pub internet: Option<HourRange>,
    /// Toggle an app restriction (repeatable)
    #[arg(long = "app")]
    pub apps: Vec<String>,
    /// Toggle a device restriction by device name (repeatable)
    #[arg(long = "device")]
    pub devices: Vec<String>,
    #[arg(long)]
    pub usage_reports: Option<bool>,
}

/// Whether a command may run without a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

impl Command {
    pub fn access(&self) -> Access {
        match self {
            Command::Login { .. } | Command::Register { .. } | Command::Status => Access::Public,
            _ => Access::Protected,
        }
    }
}
