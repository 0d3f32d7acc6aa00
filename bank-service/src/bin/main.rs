use std::io::{self, BufRead, Write};
use std::sync::Arc;

use bank_service::demo;
use bank_service::shell::{Command, Shell};
use bank_service::{BankConfig, BankService, NotificationMode};
use clap::{Parser, Subcommand};
use common::notification::{LogSink, NotificationSink, NullSink};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Retail bank CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Currency label for displayed amounts
    #[arg(short, long)]
    currency: Option<String>,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demo dataset, run sample transactions and a month-end
    Demo {
        /// Print the customer listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read commands from stdin, one per line
    Shell,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // Flags override the environment
    let mut config = BankConfig::from_env()?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let notifier: Arc<dyn NotificationSink> = match config.notifications {
        NotificationMode::Log => Arc::new(LogSink),
        NotificationMode::None => Arc::new(NullSink),
    };
    let service = BankService::with_notifier(notifier);

    info!("Starting {} (currency {})", config.bank_name, config.currency);

    match cli.command {
        Commands::Demo { json } => {
            let summary = demo::run(&service)?;
            info!(
                "Demo month-end credited {} across {} accounts",
                summary.total_interest, summary.accounts
            );

            if json {
                let customers = service.list_customers()?;
                println!("{}", serde_json::to_string_pretty(&customers)?);
            } else {
                println!("{}", Shell::new(&service, config.currency.as_str()).render_customers()?);
            }
        }
        Commands::Shell => {
            let shell = Shell::new(&service, config.currency.as_str());
            let stdin = io::stdin();
            let mut stdout = io::stdout();

            println!("{} - type 'help' for commands", config.bank_name);
            for line in stdin.lock().lines() {
                let line = line?;
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("error: {}", e);
                        continue;
                    }
                };

                let quit = command == Command::Quit;
                match shell.execute(command) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        error!("Command failed: {}", e);
                        println!("error: {}", e);
                    }
                }
                stdout.flush()?;

                if quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
