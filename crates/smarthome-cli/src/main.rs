//! smarthome - command-line dashboard for the mock smart-home backend.
//!
//! Every command runs against a persisted session: `login` stores the
//! token pair, later invocations reuse it and refresh it transparently.

mod cli;
mod guard;
mod render;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smarthome_core::models::{
    Device, DeviceAction, DeviceUpdate, NewDevice, ParentalControls, UserUpdate, KNOWN_APPS,
};
use smarthome_core::{ApiClient, ApiError, Config, Credentials, TokenStore};

use cli::{AccountCommand, Cli, Command, DeviceCommand, ParentalArgs, ParentalCommand};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, and additionally to `log_file` when configured. The
/// returned guard must be held until exit so buffered file output is flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path.file_name().unwrap_or_else(|| "smarthome.log".as_ref());
            let appender = tracing_appender::rolling::never(dir.unwrap_or(".".as_ref()), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    let _log_guard = init_tracing(&config);
    info!(base_url = %config.base_url, "smarthome starting");

    let tokens = Arc::new(config.token_store()?);
    let api = ApiClient::from_config(&config, tokens.clone())?;

    guard::check(cli.command.access(), &tokens)?;

    run(cli.command, &api, &config, &tokens).await
}

async fn run(command: Command, api: &ApiClient, config: &Config, tokens: &TokenStore) -> Result<()> {
    let explain = |err: ApiError| guard::explain(err, tokens);

    match command {
        Command::Login { username } => {
            let username = match username {
                Some(name) => name,
                None => prompt_username(config.last_username.as_deref())?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            api.login(&Credentials::new(&username, password))
                .await
                .context("Login failed")?;
            if let Err(e) = Config::remember_username(&username) {
                warn!(error = %e, "Failed to save last username");
            }
            println!("Signed in as {}.", username);
        }
        Command::Register { username } => {
            let username = match username {
                Some(name) => name,
                None => prompt_username(None)?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            let confirm = rpassword::prompt_password("Confirm password: ")?;
            if password != confirm {
                bail!("Passwords do not match");
            }
            let response = api
                .register(&Credentials::new(&username, password))
                .await
                .context("Registration failed")?;
            println!(
                "{}",
                response.message.as_deref().unwrap_or("Account created.")
            );
            println!("Run `smarthome login -u {}` to sign in.", username);
        }
        Command::Logout => {
            api.logout().await.map_err(explain)?;
            println!("Signed out.");
        }
        Command::Status => {
            if api.is_authenticated() {
                println!("Signed in to {}", api.base_url());
            } else {
                println!("Not signed in ({})", api.base_url());
            }
        }
        Command::Whoami => {
            let user = api.current_user().await.map_err(explain)?;
            print!("{}", render::user(&user));
        }
        Command::Account(AccountCommand::Update {
            username,
            email,
            password,
        }) => {
            let password = if password {
                let new = rpassword::prompt_password("New password: ")?;
                let confirm = rpassword::prompt_password("Confirm new password: ")?;
                if new != confirm {
                    bail!("Passwords do not match");
                }
                Some(new)
            } else {
                None
            };
            let update = UserUpdate {
                username,
                password,
                email,
            };
            if update.is_empty() {
                bail!("Nothing to update: pass --username, --email or --password");
            }

            if update.changes_credentials() {
                let current = rpassword::prompt_password("Current password: ")?;
                if !api.verify_password(&current).await.map_err(explain)? {
                    bail!("Current password is incorrect");
                }
            }

            let response = api.update_user(&update).await.map_err(explain)?;
            if let Some(name) = &update.username {
                if let Err(e) = Config::remember_username(name) {
                    warn!(error = %e, "Failed to save last username");
                }
            }
            println!(
                "{}",
                response.message.as_deref().unwrap_or("Account updated.")
            );
        }
        Command::Temperature => {
            let reading = api.temperature().await.map_err(explain)?;
            print!("{}", render::temperature(&reading));
        }
        Command::Devices(command) => run_device_command(command, api, tokens).await?,
        Command::Rooms => {
            let devices = api.list_devices().await.map_err(explain)?;
            print!("{}", render::rooms(&devices));
        }
        Command::Room { name } => {
            let devices = api.devices_in_room(&name).await.map_err(explain)?;
            print!("{}", render::devices(&devices));
        }
        Command::Logs => {
            let logs = api.device_logs().await.map_err(explain)?;
            print!("{}", render::logs(&logs));
        }
        Command::Parental(ParentalCommand::Show) => {
            let settings = api.parental_controls().await.map_err(explain)?;
            print!("{}", render::parental(&settings));
        }
        Command::Parental(ParentalCommand::Set(args)) => {
            let stored = api.parental_controls().await.map_err(explain)?;
            let settings = apply_parental_args(stored, args);
            let saved = api
                .save_parental_controls(&settings)
                .await
                .map_err(explain)?;
            println!("Parental controls saved.");
            print!("{}", render::parental(&saved));
        }
    }

    Ok(())
}

async fn run_device_command(command: DeviceCommand, api: &ApiClient, tokens: &TokenStore) -> Result<()> {
    let explain = |err: ApiError| guard::explain(err, tokens);

    match command {
        DeviceCommand::List => {
            let devices = api.list_devices().await.map_err(explain)?;
            print!("{}", render::devices(&devices));
        }
        DeviceCommand::Add {
            name,
            device_type,
            location,
        } => {
            let added = api
                .add_device(&NewDevice {
                    name,
                    device_type,
                    location,
                })
                .await
                .map_err(explain)?;
            println!("Added device #{}.", added.device_id);
        }
        DeviceCommand::Update {
            id,
            name,
            device_type,
            location,
        } => {
            let update = DeviceUpdate {
                name,
                device_type,
                location,
            };
            if update.is_empty() {
                bail!("Nothing to update: pass --name, --type or --location");
            }
            let device = api.update_device(id, &update).await.map_err(explain)?;
            print!("{}", render::devices(std::slice::from_ref(&device)));
        }
        DeviceCommand::Remove { id } => {
            api.delete_device(id).await.map_err(explain)?;
            println!("Removed device #{}.", id);
        }
        DeviceCommand::Toggle { id } => {
            let devices = api.list_devices().await.map_err(explain)?;
            let mut device = find_device(devices, id)?;
            api.toggle_device(&mut device).await.map_err(explain)?;
            println!("{} is now {}.", device.name, device.status.display());
        }
        DeviceCommand::Control { id, action, value } => {
            let action = match action.as_str() {
                "on" => DeviceAction::TurnOn,
                "off" => DeviceAction::TurnOff,
                _ => DeviceAction::Adjust {
                    value: parse_value(value.as_deref().unwrap_or_default()),
                },
            };
            let response = api.control_device(id, &action).await.map_err(explain)?;
            println!(
                "{}",
                response
                    .last_action
                    .as_deref()
                    .or(response.message.as_deref())
                    .unwrap_or("Done.")
            );
        }
        DeviceCommand::Status { id } => {
            let status = api.device_status(id).await.map_err(explain)?;
            print!("{}", render::device_status(&status));
        }
    }

    Ok(())
}

fn find_device(devices: Vec<Device>, id: i64) -> Result<Device> {
    devices
        .into_iter()
        .find(|d| d.id == id)
        .with_context(|| format!("No device with id {}", id))
}

/// Adjust values are sent as JSON when they parse, as a string otherwise.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn apply_parental_args(stored: ParentalControls, args: ParentalArgs) -> ParentalControls {
    let mut settings = if args.defaults || stored.is_empty() {
        ParentalControls::dashboard_defaults()
    } else {
        stored
    };

    if let Some(filter) = args.filter {
        settings.content_filtering = Some(filter);
    }
    if let Some(range) = args.time_limits {
        settings.set_time_limits(range);
    }
    if let Some(hours) = args.screen_time {
        settings.screen_time_limit = Some(hours);
    }
    if let Some(range) = args.bedtime {
        settings.set_bedtime(range);
    }
    if let Some(range) = args.internet {
        settings.set_internet_access_schedule(range);
    }
    for app in &args.apps {
        if !KNOWN_APPS.contains(&app.as_str()) {
            warn!(app = %app, "Not one of the dashboard's known apps");
        }
        settings.toggle_app_restriction(app);
    }
    for device in &args.devices {
        settings.toggle_device_restriction(device);
    }
    if let Some(enabled) = args.usage_reports {
        settings.usage_reports = Some(enabled);
    }

    settings
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(name) => print!("Username [{}]: ", name),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let entered = line.trim();

    match (entered.is_empty(), default) {
        (false, _) => Ok(entered.to_string()),
        (true, Some(name)) => Ok(name.to_string()),
        (true, None) => bail!("Username is required"),
    }
}
