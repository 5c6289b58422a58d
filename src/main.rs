//! kubetriage (kt) - find out why a Kubernetes pod is failing

use anyhow::Result;
use clap::Parser;
use kubetriage::cli::{Cli, Command};
use kubetriage::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    setup_tracing(cli.verbose);

    // Handle color settings
    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match kubetriage::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Command::Diagnose(ref args) => {
            commands::run_diagnose(
                cli.context.as_deref(),
                cli.namespace.as_deref(),
                args,
                cli.output,
                &config,
            )
            .await
        }
        Command::Monitor(ref args) => {
            commands::run_monitor(
                cli.context.as_deref(),
                cli.namespace.as_deref(),
                args,
                &config,
            )
            .await
        }
        Command::Reports(ref args) => commands::run_reports(args, cli.output, &config),
        Command::Completions(ref args) => {
            generate_completions(args.shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "kt", &mut std::io::stdout());
}
