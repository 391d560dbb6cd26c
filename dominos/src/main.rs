//! `dominos` command-line entry point.
//!
//! Parses arguments, captures settings from the environment once and
//! dispatches to the command modules. Errors are printed with a remediation
//! hint and mapped to a stable exit code.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};

use dominos::error::CliError;
use dominos::io::prompt::Prompter;
use dominos::provider::http::HttpProvider;
use dominos::settings::{DEFAULT_ORDER_API, DEFAULT_TRACKER_API, ProviderSettings, Settings};
use dominos::{config_cmd, logging, order, track};

#[derive(Parser)]
#[command(
    name = "dominos",
    version,
    about = "Order pizza from saved presets and track delivery"
)]
struct Cli {
    /// Directory holding config.json (defaults to the per-user config directory).
    #[arg(long, global = true, env = "DOMINOS_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Ordering API base URL.
    #[arg(
        long,
        global = true,
        hide = true,
        env = "DOMINOS_ORDER_API",
        default_value = DEFAULT_ORDER_API
    )]
    order_api: String,

    /// Tracker API base URL.
    #[arg(
        long,
        global = true,
        hide = true,
        env = "DOMINOS_TRACKER_API",
        default_value = DEFAULT_TRACKER_API
    )]
    tracker_api: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place an order from a saved preset (runs setup first if unconfigured).
    Order {
        /// Preset key from the `presets` section of the config.
        preset: String,
    },
    /// Manage the configuration document.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Track the most recent order for a phone number.
    Track {
        /// Phone number; defaults to `customer.phone` from the config.
        phone: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration
    Show,
    /// Open configuration in $EDITOR
    Edit,
    /// Validate configuration
    Validate,
    /// Run setup wizard
    Setup,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("✗ {err}");
        if let Some(hint) = err.hint() {
            eprintln!();
            eprintln!("{hint}");
        }
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let editor = std::env::var("EDITOR").ok();
    let visual = std::env::var("VISUAL").ok();
    let settings = Settings::resolve(
        cli.config_dir,
        editor.as_deref(),
        visual.as_deref(),
        ProviderSettings {
            order_api: cli.order_api,
            tracker_api: cli.tracker_api,
        },
    )?;
    let store = settings.store();
    let mut prompter = Prompter::terminal();

    match cli.command {
        Command::Order { preset } => {
            let provider = HttpProvider::new(&settings.provider)?;
            order::run_order(&mut prompter, &provider, &store, &preset).await?;
        }
        Command::Config { command } => match command {
            ConfigCommand::Show => config_cmd::show(&mut prompter, &store)?,
            ConfigCommand::Edit => config_cmd::edit(&mut prompter, &store, &settings.editor)?,
            ConfigCommand::Validate => config_cmd::validate(&mut prompter, &store)?,
            ConfigCommand::Setup => {
                let provider = HttpProvider::new(&settings.provider)?;
                config_cmd::setup(&mut prompter, &provider, &store).await?;
            }
        },
        Command::Track { phone } => {
            let provider = HttpProvider::new(&settings.provider)?;
            track::run_track(
                &mut prompter,
                &provider,
                &store,
                phone.as_deref(),
                Utc::now(),
            )
            .await?;
        }
    }
    Ok(())
}
