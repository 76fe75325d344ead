//! boxsync CLI - sync challenge-platform machines into a Notion database.

mod commands;
mod config;
mod progress;
mod prompt;

use clap::Parser;
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::sync::FlowSelection;

#[derive(Parser)]
#[command(name = "boxsync")]
#[command(version)]
#[command(about = "Sync challenge-platform machines into a Notion database")]
#[command(
    long_about = "boxsync mirrors machine metadata from the challenge platform into a \
Notion database: it can create rows for active, unreleased and retired machines, and \
refresh already-tracked rows when machines change lifecycle status."
)]
#[command(arg_required_else_help = true)]
#[command(after_long_help = r#"EXAMPLES
    Add everything and refresh existing rows:
        $ boxsync -sar -u

    Refresh existing rows only, without prompts:
        $ boxsync --update --yes

CONFIGURATION
    boxsync reads configuration from:
      1. Environment variables (BOXSYNC_* prefix, e.g. BOXSYNC_HTB_TOKEN)
      2. ./boxsync.toml
      3. ~/.config/boxsync/config.toml (or $XDG_CONFIG_HOME/boxsync/config.toml)
      4. .env file in the current directory

ENVIRONMENT VARIABLES
    BOXSYNC_HTB_URL            Challenge-platform base URL (default: https://labs.hackthebox.com)
    BOXSYNC_HTB_TOKEN          Challenge-platform app token
    BOXSYNC_NOTION_URL         Notion API base URL (default: https://api.notion.com)
    BOXSYNC_NOTION_TOKEN       Notion integration token
    BOXSYNC_NOTION_DATABASE    Target database ID
"#)]
struct Cli {
    /// Add all currently active machines
    #[arg(short = 'a', long)]
    active: bool,

    /// Add all scheduled-for-release (unreleased) machines
    #[arg(short = 's', long)]
    scheduled: bool,

    /// Add all retired machines
    #[arg(short = 'r', long)]
    retired: bool,

    /// Update tracked rows to reflect platform changes
    #[arg(short = 'u', long)]
    update: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long = "yes")]
    assume_yes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging). TTY runs
    // use the interactive progress reporter instead.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("boxsync=info,boxsync_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    let selection = FlowSelection {
        active: cli.active,
        scheduled: cli.scheduled,
        retired: cli.retired,
        update: cli.update,
        assume_yes: cli.assume_yes,
    };

    commands::sync::handle_sync(selection, &config).await
}
