use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use quiz_cli::commands::{check, run};
use quiz_cli::{Cli, Commands, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so they never interleave with the quiz screens
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Run { questions }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let path = questions.as_deref().or(config.questions_path.as_deref());
            let set = run::load_question_set(path)?;

            let input = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout().lock();
            run::run(input, &mut stdout, set, &config).await?;
        }
        Some(Commands::Check { questions }) => {
            let mut stdout = std::io::stdout().lock();
            check::run(&mut stdout, questions)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    std::io::stdout().flush()?;
    Ok(())
}
