//! `nicdecode` - CLI for decoding Sri Lankan NIC numbers
//!
//! Runs the interactive verification screen on a terminal, or decodes NIC
//! numbers passed on the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use nicdecode::cli::{CheckCommand, Cli, Command, ConfigCommand};
use nicdecode::shell::LineAction;
use nicdecode::{init_logging, App, CheckOutcome, Config, Pacing, Renderer};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            run_interactive(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(check_cmd) => handle_check(&config, &check_cmd),
        Command::Config(config_cmd) => {
            handle_config(&config, config_cmd)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_interactive(config: &Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(interactive(config))
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let pacing = Pacing::from_config(config);
    let renderer = Renderer::new(config.shell.show_icons);
    let mut app = App::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    tracing::debug!(?pacing, "interactive shell started");
    renderer.present(&mut stdout, &renderer.screen(&app))?;

    while let Some(line) = lines.next_line().await? {
        match app.handle_line(&line) {
            LineAction::Quit => break,
            LineAction::Switch(transition) => {
                pacing.before_transition().await;
                app.complete_transition(transition);
            }
            LineAction::Submit(submission) => {
                renderer.present(&mut stdout, &renderer.screen(&app))?;
                pacing.before_reveal().await;
                app.complete_submission(submission);
            }
            LineAction::Redraw => {}
        }
        renderer.present(&mut stdout, &renderer.screen(&app))?;
    }

    tracing::debug!("interactive shell finished");
    Ok(())
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<ExitCode> {
    let outcomes: Vec<CheckOutcome> = cmd
        .nics
        .iter()
        .map(String::as_str)
        .map(CheckOutcome::decode)
        .collect();
    let format = cmd.format.unwrap_or(config.output.format);

    let renderer = Renderer::new(config.shell.show_icons);
    println!("{}", renderer.report(&outcomes, format, cmd.explain)?);

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::info!(failed, total = outcomes.len(), "some NICs could not be decoded");
        Ok(ExitCode::FAILURE)
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Shell]");
                println!("  Reveal delay (ms):     {}", config.shell.reveal_delay_ms);
                println!("  Transition delay (ms): {}", config.shell.transition_delay_ms);
                println!("  Show icons:            {}", config.shell.show_icons);
                println!();
                println!("[Output]");
                println!("  Format:                {:?}", config.output.format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) if e.is_config_error() => println!("Configuration error: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
