use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{handle_fetch_command, handle_status_command, handle_watch_command};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "aizhong")]
#[command(version = VERSION)]
#[command(about = "Aizhong - prepaid balance and service-interruption monitor")]
#[command(long_about = r#"
Aizhong monitors a prepaid water/gas utility account: it logs in to the
provider portal, reads the prepaid balance of every bound sub-account, and
collects planned water-interruption notices.

Use 'aizhong fetch' for a one-shot reading, 'aizhong watch' to refresh
continuously, and 'aizhong status' to check account availability.

Credentials come from AIZHONG_PHONE and AIZHONG_PASSWORD (or an aizhong.toml
configuration file).
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run one refresh cycle and print the account snapshot")]
    Fetch {
        #[arg(short, long, default_value = "text", help = "Output format: text or json")]
        format: String,
    },

    #[command(about = "Refresh continuously at the configured interval")]
    Watch {
        #[arg(short, long, help = "Override the refresh interval in seconds")]
        interval: Option<u64>,
    },

    #[command(about = "Run one refresh cycle and show the coordinator status")]
    Status {
        #[arg(short, long, default_value = "text", help = "Output format: text or json")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Fetch { format } => handle_fetch_command(&format).await,
        Commands::Watch { interval } => handle_watch_command(interval).await,
        Commands::Status { format } => handle_status_command(&format).await,
    }
}
